use thiserror::Error;

/// Failures the panel surfaces to the user.
///
/// Every variant renders as the message shown inline (reads) or in an
/// alert (writes). Transient and permanent fetch failures are not told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// Network failure or a non-2xx response. `status` is `None` when no
    /// response arrived at all.
    #[error("{message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Table schema not found for: {0}")]
    SchemaMismatch(String),
}

impl PanelError {
    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        PanelError::Fetch {
            status,
            message: message.into(),
        }
    }
}

pub type PanelResult<T> = std::result::Result<T, PanelError>;

/// Failures on the backend side, each mapped to an HTTP status by the server.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    UnknownTable(String),

    #[error("{0} is required")]
    MissingPrimaryKey(String),

    #[error("No data provided for update")]
    NoUpdateData,

    #[error("ID and primary key are required")]
    MissingDeleteTarget,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
