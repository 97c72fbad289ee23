use crate::libs::backend::{DeleteRequest, ErrorBody};
use crate::libs::error::StoreError;
use crate::libs::primary_key::PrimaryKeyRegistry;
use crate::libs::schema::TableSchema;
use crate::libs::store::{delete_target, split_update, Store};
use crate::libs::value::Record;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared by every handler.
#[derive(Clone)]
pub struct ApiState {
    store: Arc<dyn Store>,
    keys: Arc<PrimaryKeyRegistry>,
    /// Already redacted.
    database_url: Arc<str>,
}

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct DebugInfo {
    database_url: String,
    database_status: String,
    tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tables_error: Option<String>,
}

/// A store failure rendered as `{ "error": ... }` with a matching status.
struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::UnknownTable(_) => StatusCode::NOT_FOUND,
            StoreError::MissingPrimaryKey(_)
            | StoreError::NoUpdateData
            | StoreError::MissingDeleteTarget
            | StoreError::UnknownColumn(_) => StatusCode::BAD_REQUEST,
            StoreError::Database(_) | StoreError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("{}: {}", status, self.0);
        let body = ErrorBody {
            error: Some(self.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Routes of the REST surface the panel consumes. `database_url` is only
/// ever shown by `/debug-info` and must come in redacted.
pub fn router(store: Arc<dyn Store>, keys: PrimaryKeyRegistry, database_url: &str) -> Router {
    let state = ApiState {
        store,
        keys: Arc::new(keys),
        database_url: Arc::from(database_url),
    };
    Router::new()
        .route("/api/tables", get(list_tables))
        .route(
            "/api/table/:table",
            get(list_rows)
                .post(create_record)
                .put(update_record)
                .delete(delete_record),
        )
        .route("/test-db", get(test_db))
        .route("/debug-info", get(debug_info))
        .with_state(state)
}

/// Serves `router` on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("listening on http://{}", addr);
    }
    axum::serve(listener, router).await
}

// -------- Handlers --------

async fn list_tables(State(api): State<ApiState>) -> ApiResult<Vec<TableSchema>> {
    let tables = api.store.tables().await?;
    Ok(Json(tables))
}

async fn list_rows(
    State(api): State<ApiState>,
    Path(table): Path<String>,
) -> ApiResult<Vec<Record>> {
    let rows = api.store.rows(&table).await?;
    Ok(Json(rows))
}

async fn create_record(
    State(api): State<ApiState>,
    Path(table): Path<String>,
    Json(body): Json<Record>,
) -> ApiResult<Message> {
    api.store.insert(&table, &body).await?;
    Ok(Json(Message {
        message: "Record added successfully",
    }))
}

async fn update_record(
    State(api): State<ApiState>,
    Path(table): Path<String>,
    Json(body): Json<Record>,
) -> ApiResult<Message> {
    let primary_key = api.keys.resolve(&table).to_string();
    let (id, changes) = split_update(body, &primary_key)?;
    api.store.update(&table, &primary_key, &id, &changes).await?;
    Ok(Json(Message {
        message: "Record updated successfully",
    }))
}

async fn delete_record(
    State(api): State<ApiState>,
    Path(table): Path<String>,
    Json(body): Json<DeleteRequest>,
) -> ApiResult<Message> {
    let (primary_key, id) = delete_target(&body)?;
    api.store.delete(&table, primary_key, id).await?;
    Ok(Json(Message {
        message: "Record deleted successfully",
    }))
}

async fn test_db(State(api): State<ApiState>) -> ApiResult<Status> {
    api.store.ping().await?;
    Ok(Json(Status {
        status: "Database connection successful",
    }))
}

/// Connection and schema report. Never fails; each failing part is folded
/// into the body.
async fn debug_info(State(api): State<ApiState>) -> Json<DebugInfo> {
    let database_status = match api.store.ping().await {
        Ok(()) => "Connected".to_string(),
        Err(e) => format!("Error: {}", e),
    };
    let (tables, tables_error) = match api.store.tables().await {
        Ok(tables) => (tables.into_iter().map(|t| t.name).collect(), None),
        Err(e) => {
            log::error!("debug info could not list tables: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };
    Json(DebugInfo {
        database_url: api.database_url.to_string(),
        database_status,
        tables,
        tables_error,
    })
}
