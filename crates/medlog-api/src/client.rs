//! HTTP client for a medication log backend.

use std::fmt;
use std::time::Duration;

use medlog_core::{MedicationEntry, NewEntry};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use crate::ApiError;
use crate::wire::{EntryRow, ErrorResponse, LogRequest, decode_row};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an unexpected body is quoted in errors.
const BODY_PREVIEW_CHARS: usize = 100;

/// Medication log API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the backend at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|err| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        // Relative joins replace the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    /// Submits one entry to `POST /log`.
    pub async fn submit(&self, entry: &NewEntry) -> Result<(), ApiError> {
        let url = self.endpoint("log")?;
        tracing::debug!(%url, medication = %entry.medication, "submitting entry");

        let response = self
            .http
            .post(url)
            .json(&LogRequest::from(entry))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(api_error(status.as_u16(), &body, "Failed to log medication"))
    }

    /// Fetches all entries from `GET /medications`, most recent first.
    pub async fn fetch_all(&self) -> Result<Vec<MedicationEntry>, ApiError> {
        let url = self.endpoint("medications")?;
        tracing::debug!(%url, "fetching history");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(
                status.as_u16(),
                &body,
                "Failed to fetch medication logs",
            ));
        }
        if !content_type.is_some_and(|value| value.contains("application/json")) {
            return Err(ApiError::InvalidResponse(format!(
                "expected JSON, got: {}",
                preview(&body)
            )));
        }

        parse_history(&body)
    }
}

fn parse_history(body: &str) -> Result<Vec<MedicationEntry>, ApiError> {
    let rows: Vec<EntryRow> =
        serde_json::from_str(body).map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    Ok(rows.into_iter().map(decode_row).collect())
}

/// Builds an API error, preferring the backend's `error` field.
fn api_error(status: u16, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| fallback.to_string(), |payload| payload.error);
    ApiError::Api { status, message }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::response::Html;
    use axum::routing::get;
    use medlog_core::EntrySource;
    use medlog_db::Database;
    use tokio::net::TcpListener;

    use crate::server::{AppState, router};

    /// Serves `app` on an ephemeral local port and returns its base URL.
    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_backend() -> Client {
        let app = router(AppState::new(Database::open_in_memory().unwrap()));
        Client::new(&spawn(app).await).unwrap()
    }

    #[tokio::test]
    async fn submit_then_fetch_all() {
        let client = spawn_backend().await;

        let first = NewEntry::new("Aspirin", "2024-03-15T09:00", EntrySource::Scanner, None).unwrap();
        let second = NewEntry::new(
            "Ibuprofen",
            "2024-03-15T13:00",
            EntrySource::Manual,
            Some("after lunch".to_string()),
        )
        .unwrap();
        client.submit(&first).await.unwrap();
        client.submit(&second).await.unwrap();

        let entries = client.fetch_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[0].medication, "Ibuprofen");
        assert_eq!(entries[0].notes(), Some("after lunch"));
        assert_eq!(entries[1].medication, "Aspirin");
        assert_eq!(entries[1].timestamp, "2024-03-15T09:00");
        assert_eq!(entries[1].entry_source(), Some(EntrySource::Scanner));
    }

    #[tokio::test]
    async fn submit_surfaces_backend_error_message() {
        let client = spawn_backend().await;
        let mut entry = NewEntry::new("Aspirin", "2024-03-15T09:00", EntrySource::Manual, None).unwrap();
        entry.timestamp = String::new();

        let err = client.submit(&entry).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Api { status: 400, ref message } if message == "Medication and timestamp are required!"
        ));
        assert!(client.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_all_rejects_html() {
        let app = Router::new().route(
            "/medications",
            get(|| async { Html("<html><body>maintenance</body></html>") }),
        );
        let client = Client::new(&spawn(app).await).unwrap();

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidResponse(ref message) if message.starts_with("expected JSON, got: <html>")
        ));
    }

    #[tokio::test]
    async fn fetch_all_reports_failed_status() {
        let app = Router::new().route(
            "/medications",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = Client::new(&spawn(app).await).unwrap();

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Api { status: 502, ref message } if message == "Failed to fetch medication logs"
        ));
    }

    #[test]
    fn client_rejects_unparseable_url() {
        assert!(matches!(
            Client::new("not a url"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn client_rejects_non_http_scheme() {
        assert!(matches!(
            Client::new("ftp://example.com"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let client = Client::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            client.endpoint("log").unwrap().as_str(),
            "http://localhost:5000/api/log"
        );

        let client = Client::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.endpoint("medications").unwrap().as_str(),
            "http://localhost:5000/medications"
        );
    }

    #[test]
    fn client_debug_shows_base_url() {
        let client = Client::new("http://localhost:5000").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("http://localhost:5000/"));
    }

    #[test]
    fn api_error_prefers_backend_message() {
        let err = api_error(400, r#"{"error":"Medication and timestamp are required!"}"#, "x");
        assert!(matches!(
            err,
            ApiError::Api { status: 400, ref message } if message == "Medication and timestamp are required!"
        ));

        let err = api_error(502, "<html>Bad Gateway</html>", "Failed to fetch medication logs");
        assert!(matches!(
            err,
            ApiError::Api { ref message, .. } if message == "Failed to fetch medication logs"
        ));
    }

    #[test]
    fn parse_history_decodes_rows() {
        let entries = parse_history(
            r#"[[2,"Ibuprofen","2024-03-15T13:00","nfc",""],[1,"Aspirin","2024-03-15T09:00","manual","with food"]]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[1].entry_source(), Some(EntrySource::Manual));
        assert_eq!(entries[1].notes(), Some("with food"));
    }

    #[test]
    fn parse_history_rejects_objects() {
        let err = parse_history(r#"{"medications":[]}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn preview_truncates_by_chars() {
        let body = "é".repeat(150);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
