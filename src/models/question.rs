use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub category: Category,
    pub question_text: String,
    pub question_image_url: Option<String>,
    pub options: Vec<QuestionOption>,
    pub explanation: String,
    pub explanation_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exam section a question belongs to. Closed set; anything else is
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Tiu,
    Twk,
    Tkp,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tiu => "TIU",
            Category::Twk => "TWK",
            Category::Tkp => "TKP",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TIU" => Ok(Category::Tiu),
            "TWK" => Ok(Category::Twk),
            "TKP" => Ok(Category::Tkp),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub code: String,
    pub text: String,
    pub score: i32,
}

/// A question row as stored: the options column is still its raw JSON
/// value. Decoding it is the repository's job, via `decode_options`.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub category: String,
    pub question_text: String,
    pub question_image_url: Option<String>,
    pub options: JsonValue,
    pub explanation: String,
    pub explanation_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Encodes an option list into the single-column JSON value stored on the
/// question row: an array of `{"code", "text", "score"}` objects.
pub fn encode_options(options: &[QuestionOption]) -> serde_json::Result<JsonValue> {
    serde_json::to_value(options)
}

/// Decodes the stored options column back into an ordered option list.
pub fn decode_options(value: JsonValue) -> serde_json::Result<Vec<QuestionOption>> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_encode_to_the_stored_column_shape() {
        let options = vec![
            QuestionOption {
                code: "A".to_string(),
                text: "first".to_string(),
                score: 5,
            },
            QuestionOption {
                code: "B".to_string(),
                text: "second".to_string(),
                score: 0,
            },
        ];

        let encoded = encode_options(&options).unwrap();
        assert_eq!(
            encoded,
            json!([
                {"code": "A", "text": "first", "score": 5},
                {"code": "B", "text": "second", "score": 0},
            ])
        );

        let decoded = decode_options(encoded).unwrap();
        assert_eq!(decoded, options);
    }

    #[test]
    fn decode_rejects_a_malformed_column_value() {
        assert!(decode_options(json!({"code": "A"})).is_err());
        assert!(decode_options(json!([{"code": "A", "text": "x"}])).is_err());
        assert!(decode_options(json!("not an array")).is_err());
    }

    #[test]
    fn decode_accepts_an_empty_array() {
        assert_eq!(decode_options(json!([])).unwrap(), Vec::new());
    }

    #[test]
    fn category_round_trips_through_its_string_form() {
        for category in [Category::Tiu, Category::Twk, Category::Tkp] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("SKB".parse::<Category>().is_err());
        assert!("tiu".parse::<Category>().is_err());
    }
}
