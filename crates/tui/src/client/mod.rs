use std::time::Duration;

use api_types::{ErrorResponse, expense::ExpenseRecord, history::HistoryQuery};
use reqwest::{StatusCode, Url, header};

use crate::error::{AppError, Result};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client of the expense query service.
#[derive(Debug, Clone)]
pub struct Client {
    history_url: Url,
    http: reqwest::Client,
    session_cookie: Option<String>,
}

impl Client {
    pub fn new(base_url: &str, session_cookie: Option<String>, timeout: Duration) -> Result<Self> {
        let invalid = |reason: String| AppError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        // `join` replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let history_url = base
            .join("api/expenses/history")
            .map_err(|err| invalid(err.to_string()))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            history_url,
            http,
            session_cookie,
        })
    }

    /// `GET /api/expenses/history?start=..&end=..`
    pub async fn expenses_history(
        &self,
        query: &HistoryQuery,
    ) -> std::result::Result<Vec<ExpenseRecord>, ClientError> {
        let mut req = self.http.get(self.history_url.clone()).query(query);
        if let Some(cookie) = self.session_cookie.as_deref() {
            req = req.header(header::COOKIE, cookie);
        }

        tracing::debug!("GET history {} .. {}", query.start, query.end);
        let res = req.send().await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<Vec<ExpenseRecord>>().await?);
        }

        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => ClientError::Server { status, message },
        };
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use api_types::expense::CategoryRef;
    use axum::{
        Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
    };
    use serde_json::{Value, json};

    use super::*;

    async fn history(
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        let cookie = headers
            .get("cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if cookie != "token=abc" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            );
        }
        if params.get("start").map(String::as_str) != Some("2026-04-03T00:00:00.000Z")
            || params.get("end").map(String::as_str) != Some("2026-04-10T00:00:00.000Z")
        {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "bad range" })),
            );
        }
        (
            StatusCode::OK,
            Json(json!([
                {
                    "_id": "a",
                    "title": "Lunch",
                    "amount": 12.5,
                    "date": "2026-04-03T12:00:00.000Z",
                    "category": { "_id": "c1", "name": "Food" },
                    "description": "with team"
                },
                {
                    "_id": "b",
                    "title": "Train",
                    "amount": 3,
                    "date": "2026-04-04T08:00:00.000Z",
                    "category": "65ff00aa"
                }
            ])),
        )
    }

    async fn spawn_server() -> String {
        let app = Router::new().route("/api/expenses/history", get(history));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn query(start: &str, end: &str) -> HistoryQuery {
        HistoryQuery {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[tokio::test]
    async fn history_sends_range_and_cookie() {
        let base_url = spawn_server().await;
        let client = Client::new(
            &base_url,
            Some("token=abc".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let records = client
            .expenses_history(&query(
                "2026-04-03T00:00:00.000Z",
                "2026-04-10T00:00:00.000Z",
            ))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Lunch");
        assert_eq!(
            records[1].category,
            Some(CategoryRef::Reference("65ff00aa".to_string()))
        );
    }

    #[tokio::test]
    async fn missing_session_is_unauthorized() {
        let base_url = spawn_server().await;
        let client = Client::new(&base_url, None, Duration::from_secs(5)).unwrap();

        let err = client
            .expenses_history(&query(
                "2026-04-03T00:00:00.000Z",
                "2026-04-10T00:00:00.000Z",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn server_error_carries_message() {
        let base_url = spawn_server().await;
        let client = Client::new(
            &base_url,
            Some("token=abc".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client
            .expenses_history(&query("2026-01-01T00:00:00.000Z", "2026-01-02T00:00:00.000Z"))
            .await
            .unwrap_err();
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "bad range");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let client = Client::new(
            "http://127.0.0.1:9/",
            None,
            Duration::from_millis(500),
        )
        .unwrap();
        let err = client
            .expenses_history(&query("2026-04-03T00:00:00.000Z", "2026-04-10T00:00:00.000Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        for url in ["not a url", "mailto:someone@example.com"] {
            let err = Client::new(url, None, Duration::from_secs(1)).unwrap_err();
            assert!(matches!(err, AppError::InvalidUrl { .. }), "{url}: {err:?}");
        }
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        for url in ["http://host/spend", "http://host/spend/"] {
            let client = Client::new(url, None, Duration::from_secs(1)).unwrap();
            assert_eq!(
                client.history_url.as_str(),
                "http://host/spend/api/expenses/history"
            );
        }
        let client = Client::new("http://host:5000", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.history_url.as_str(),
            "http://host:5000/api/expenses/history"
        );
    }

    #[tokio::test]
    async fn history_reached_behind_path_prefix() {
        let app = Router::new().nest(
            "/spend",
            Router::new().route("/api/expenses/history", get(history)),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::new(
            &format!("http://{addr}/spend"),
            Some("token=abc".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let records = client
            .expenses_history(&query(
                "2026-04-03T00:00:00.000Z",
                "2026-04-10T00:00:00.000Z",
            ))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }
}
