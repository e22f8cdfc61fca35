use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tryout_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/questions",
            get(routes::question::list_questions).post(routes::question::create_question),
        )
        .route(
            "/api/questions/:id",
            put(routes::question::update_question).delete(routes::question::delete_question),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
