use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// Category as returned by the expense service.
    ///
    /// The service expands the category into an object when it can and falls
    /// back to the bare category id otherwise; both shapes must deserialize.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum CategoryRef {
        Expanded(Category),
        Reference(String),
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(rename = "_id", alias = "id", default)]
        pub id: String,
        #[serde(default)]
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub title: String,
        /// Non-negative amount in major units (e.g. `12.5`).
        pub amount: f64,
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub category: Option<CategoryRef>,
        #[serde(default)]
        pub description: Option<String>,
    }
}

pub mod history {
    use super::*;

    /// Query string of `GET /api/expenses/history`.
    ///
    /// The same pair is mirrored into the share link, so both bounds are kept
    /// as the exact ISO-8601 strings that went on the wire.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HistoryQuery {
        pub start: String,
        pub end: String,
    }

    /// Partially filled query, as found in a link typed by the user.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HistoryQueryParams {
        pub start: Option<String>,
        pub end: Option<String>,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
}
