use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::question_dto::{CreateQuestionPayload, ListQuestionsQuery, PaginatedQuestionQuery},
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionPayload,
    responses(
        (status = 201, description = "Question created successfully"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.question_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    get,
    path = "/api/questions",
    params(
        ("limit" = Option<String>, Query, description = "Page size, 1 to 20"),
        ("offset" = Option<String>, Query, description = "Rows to skip"),
        ("search" = Option<String>, Query, description = "Substring match on question text")
    ),
    responses(
        (status = 200, description = "Paginated list of questions"),
        (status = 400, description = "Pagination parameters out of bounds")
    )
)]
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Query(raw): Query<ListQuestionsQuery>,
) -> Result<impl IntoResponse> {
    let query = PaginatedQuestionQuery::default().parse(&raw);
    query.validate()?;
    let result = state.question_service.list(query).await?;
    Ok(Json(result))
}

#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    request_body = CreateQuestionPayload,
    responses(
        (status = 200, description = "Question updated successfully"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    if id < 1 {
        return Err(Error::BadRequest("invalid question id".to_string()));
    }
    payload.validate()?;
    let question = state.question_service.update(id, payload).await?;
    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted successfully"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    if id < 1 {
        return Err(Error::BadRequest("invalid question id".to_string()));
    }
    state.question_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
