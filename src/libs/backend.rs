use crate::libs::error::{PanelError, PanelResult};
use crate::libs::schema::TableSchema;
use crate::libs::value::{Record, Value};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const TABLES_FALLBACK: &str = "Failed to fetch tables";
pub const ROWS_FALLBACK: &str = "Failed to fetch rows";
pub const MUTATION_FALLBACK: &str = "Unknown error";

/// Body of a delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "primaryKey", default)]
    pub primary_key: String,
    #[serde(default = "null_id")]
    pub id: Value,
}

fn null_id() -> Value {
    Value::Null
}

/// `{ "error": "..." }` as sent with every non-2xx response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// The schema and row data providers the panel talks to.
///
/// Each call is one round trip. No retries, no cancellation, no timeout.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_tables(&self) -> PanelResult<Vec<TableSchema>>;

    async fn fetch_rows(&self, table: &str) -> PanelResult<Vec<Record>>;

    async fn create_record(&self, table: &str, record: &Record) -> PanelResult<serde_json::Value>;

    async fn update_record(&self, table: &str, record: &Record) -> PanelResult<serde_json::Value>;

    async fn delete_record(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> PanelResult<serde_json::Value>;
}

/// [`Backend`] over the REST surface served by [`crate::server`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> PanelResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PanelError::fetch(None, format!("Invalid API address {base_url}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn url(&self, segments: &[&str]) -> PanelResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| PanelError::fetch(None, "API address cannot carry a path"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        fallback: &str,
    ) -> PanelResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        log::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            log::error!("request failed: {}", e);
            PanelError::fetch(None, e.to_string())
        })?;
        read_json(response, fallback).await
    }
}

/// Turns a response into `T`, or into a fetch error carrying the backend's
/// `error` message (or `fallback` when it sent none).
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> PanelResult<T> {
    let status = response.status();
    let code = Some(status.as_u16());
    let body = response
        .text()
        .await
        .map_err(|e| PanelError::fetch(code, e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| fallback.to_string());
        log::error!("backend answered {}: {}", status, message);
        return Err(PanelError::fetch(code, message));
    }

    serde_json::from_str(&body).map_err(|e| PanelError::fetch(code, e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_tables(&self) -> PanelResult<Vec<TableSchema>> {
        let url = self.url(&["api", "tables"])?;
        self.send::<(), _>(Method::GET, url, None, TABLES_FALLBACK)
            .await
    }

    async fn fetch_rows(&self, table: &str) -> PanelResult<Vec<Record>> {
        let url = self.url(&["api", "table", table])?;
        self.send::<(), _>(Method::GET, url, None, ROWS_FALLBACK)
            .await
    }

    async fn create_record(&self, table: &str, record: &Record) -> PanelResult<serde_json::Value> {
        let url = self.url(&["api", "table", table])?;
        self.send(Method::POST, url, Some(record), MUTATION_FALLBACK)
            .await
    }

    async fn update_record(&self, table: &str, record: &Record) -> PanelResult<serde_json::Value> {
        let url = self.url(&["api", "table", table])?;
        self.send(Method::PUT, url, Some(record), MUTATION_FALLBACK)
            .await
    }

    async fn delete_record(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> PanelResult<serde_json::Value> {
        let url = self.url(&["api", "table", table])?;
        self.send(Method::DELETE, url, Some(request), MUTATION_FALLBACK)
            .await
    }
}
