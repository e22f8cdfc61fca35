use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;

use crate::dto::question_dto::{
    CreateQuestionPayload, PageMeta, PaginatedQuestionQuery, QuestionListResponse,
};
use crate::error::{Error, Result};
use crate::models::question::{
    decode_options, encode_options, Question, QuestionOption, QuestionRow,
};

/// Upper bound on any single statement against the store.
const STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

const QUESTION_COLUMNS: &str = "id, category, question_text, question_image_url, options, \
     explanation, explanation_image_url, created_at, updated_at";

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
    filtered_count: bool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            filtered_count: false,
        }
    }

    /// When enabled, the pagination total counts only rows matching the
    /// search term. Off by default: the stock behavior counts the whole
    /// table regardless of the filter, so total_items/total_pages can
    /// overcount a filtered listing. See DESIGN.md before flipping this.
    pub fn with_filtered_count(mut self, filtered_count: bool) -> Self {
        self.filtered_count = filtered_count;
        self
    }

    pub async fn create(&self, payload: CreateQuestionPayload) -> Result<Question> {
        let options = payload_options(&payload.options);
        let options_json = encode_options(&options)?;

        let sql = format!(
            "INSERT INTO questions \
                 (category, question_text, question_image_url, options, \
                  explanation, explanation_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {QUESTION_COLUMNS}"
        );

        let row = bounded(
            sqlx::query_as::<_, QuestionRow>(&sql)
                .bind(payload.category.as_str())
                .bind(&payload.question_text)
                .bind(&payload.question_image_url)
                .bind(options_json)
                .bind(&payload.explanation)
                .bind(&payload.explanation_image_url)
                .fetch_one(&self.pool),
        )
        .await?;

        decode_row(row)
    }

    pub async fn list(&self, query: PaginatedQuestionQuery) -> Result<QuestionListResponse> {
        let search_param: Option<String> = if query.search.is_empty() {
            None
        } else {
            Some(format!("%{}%", query.search))
        };

        // The stock total ignores the search term even though the data
        // query applies it; `filtered_count` opts into the consistent
        // variant.
        let count_query = if self.filtered_count {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM questions \
                 WHERE ($1::text IS NULL OR question_text ILIKE $1)",
            )
            .bind(&search_param)
        } else {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        };
        let total_items = bounded(count_query.fetch_one(&self.pool)).await?;

        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE ($1::text IS NULL OR question_text ILIKE $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let rows = bounded(
            sqlx::query_as::<_, QuestionRow>(&sql)
                .bind(&search_param)
                .bind(query.limit)
                .bind(query.offset)
                .fetch_all(&self.pool),
        )
        .await?;

        let data = rows
            .into_iter()
            .map(decode_row)
            .collect::<Result<Vec<Question>>>()?;
        let meta = PageMeta::new(total_items, query.limit, query.offset);

        Ok(QuestionListResponse { data, meta })
    }

    pub async fn update(&self, id: i64, payload: CreateQuestionPayload) -> Result<Question> {
        let options = payload_options(&payload.options);
        let options_json = encode_options(&options)?;

        let sql = format!(
            "UPDATE questions \
             SET category = $1, question_text = $2, question_image_url = $3, \
                 options = $4, explanation = $5, explanation_image_url = $6, \
                 updated_at = NOW() \
             WHERE id = $7 \
             RETURNING {QUESTION_COLUMNS}"
        );

        let row = bounded(
            sqlx::query_as::<_, QuestionRow>(&sql)
                .bind(payload.category.as_str())
                .bind(&payload.question_text)
                .bind(&payload.question_image_url)
                .bind(options_json)
                .bind(&payload.explanation)
                .bind(&payload.explanation_image_url)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| Error::NotFound(format!("question {} not found", id)))?;

        decode_row(row)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = bounded(
            sqlx::query("DELETE FROM questions WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("question {} not found", id)));
        }

        Ok(())
    }
}

async fn bounded<T, F>(op: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STATEMENT_TIMEOUT, op).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Timeout),
    }
}

fn payload_options(options: &[crate::dto::question_dto::OptionPayload]) -> Vec<QuestionOption> {
    options
        .iter()
        .map(|opt| QuestionOption {
            code: opt.code.clone(),
            text: opt.text.clone(),
            score: opt.score,
        })
        .collect()
}

fn decode_row(row: QuestionRow) -> Result<Question> {
    let options = decode_options(row.options)
        .map_err(|e| Error::Internal(format!("corrupt options for question {}: {}", row.id, e)))?;
    let category = row
        .category
        .parse()
        .map_err(|e| Error::Internal(format!("question {}: {}", row.id, e)))?;

    Ok(Question {
        id: row.id,
        category,
        question_text: row.question_text,
        question_image_url: row.question_image_url,
        options,
        explanation: row.explanation,
        explanation_image_url: row.explanation_image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
