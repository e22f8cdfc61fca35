use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::{Category, Question};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    pub category: Category,
    #[validate(length(min = 10, max = 500))]
    pub question_text: String,
    #[validate(url)]
    pub question_image_url: Option<String>,
    #[validate(length(min = 2), nested)]
    pub options: Vec<OptionPayload>,
    #[validate(length(min = 1))]
    pub explanation: String,
    #[validate(url)]
    pub explanation_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionPayload {
    #[validate(length(equal = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 0, max = 5))]
    pub score: i32,
}

/// Raw list query as it arrives on the URL. Everything is kept as a string
/// so that unparsable values can fall back to defaults instead of failing
/// extraction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListQuestionsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct PaginatedQuestionQuery {
    #[validate(range(min = 1, max = 20))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
    #[validate(length(max = 100))]
    pub search: String,
}

impl Default for PaginatedQuestionQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            search: String::new(),
        }
    }
}

impl PaginatedQuestionQuery {
    /// Overlays raw query values onto the defaults. A limit or offset that
    /// does not parse as a number is silently ignored, keeping the prior
    /// value; bounds are checked separately with `validate()`.
    pub fn parse(mut self, raw: &ListQuestionsQuery) -> Self {
        if let Some(limit) = raw.limit.as_deref() {
            if let Ok(value) = limit.parse() {
                self.limit = value;
            }
        }

        if let Some(offset) = raw.offset.as_deref() {
            if let Ok(value) = offset.parse() {
                self.offset = value;
            }
        }

        if let Some(search) = raw.search.as_deref() {
            if !search.is_empty() {
                self.search = search.to_string();
            }
        }

        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(total_items: i64, limit: i64, offset: i64) -> Self {
        let (current_page, total_pages) = if limit > 0 {
            (
                offset / limit + 1,
                ((total_items as f64) / (limit as f64)).ceil() as i64,
            )
        } else {
            (0, 0)
        };

        Self {
            current_page,
            limit,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionListResponse {
    pub data: Vec<Question>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(limit: Option<&str>, offset: Option<&str>, search: Option<&str>) -> ListQuestionsQuery {
        ListQuestionsQuery {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
            search: search.map(String::from),
        }
    }

    #[test]
    fn absent_values_keep_the_defaults() {
        let query = PaginatedQuestionQuery::default().parse(&raw(None, None, None));
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert_eq!(query.search, "");
    }

    #[test]
    fn numeric_values_override_the_defaults() {
        let query = PaginatedQuestionQuery::default().parse(&raw(
            Some("5"),
            Some("10"),
            Some("logika"),
        ));
        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 10);
        assert_eq!(query.search, "logika");
    }

    #[test]
    fn unparsable_values_are_silently_ignored() {
        let query = PaginatedQuestionQuery::default().parse(&raw(Some("abc"), Some(""), None));
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn bounds_are_enforced_by_validation_not_parsing() {
        let query = PaginatedQuestionQuery::default().parse(&raw(Some("50"), None, None));
        assert_eq!(query.limit, 50);
        assert!(query.validate().is_err());

        let query = PaginatedQuestionQuery::default().parse(&raw(None, Some("-3"), None));
        assert!(query.validate().is_err());

        let query = PaginatedQuestionQuery::default().parse(&raw(
            None,
            None,
            Some("x".repeat(101).as_str()),
        ));
        assert!(query.validate().is_err());

        let query = PaginatedQuestionQuery::default().parse(&raw(Some("1"), Some("0"), None));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn page_meta_matches_the_documented_formulas() {
        assert_eq!(
            PageMeta::new(45, 20, 0),
            PageMeta {
                current_page: 1,
                limit: 20,
                total_items: 45,
                total_pages: 3,
            }
        );

        assert_eq!(PageMeta::new(45, 20, 40).current_page, 3);
        assert_eq!(PageMeta::new(45, 20, 39).current_page, 2);
        assert_eq!(PageMeta::new(0, 20, 0).total_pages, 0);
        assert_eq!(PageMeta::new(20, 20, 0).total_pages, 1);
        assert_eq!(PageMeta::new(21, 20, 0).total_pages, 2);
    }

    #[test]
    fn page_meta_with_a_degenerate_limit() {
        let meta = PageMeta::new(45, 0, 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.current_page, 0);
    }
}
