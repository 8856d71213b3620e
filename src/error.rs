use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("No data source configured")]
    NoDataSource { hint: String },
    #[error("Failed to load listings: {0}")]
    FetchFailed(String),
}

/// Failures of the remote collaborator. Every variant is a "network" failure
/// from the view's point of view: the page is cleared, never retried.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Transport error: {message}")]
    Transport { endpoint: String, message: String },
    #[error("Malformed response: {message}")]
    MalformedResponse { endpoint: String, message: String },
    #[error("Server reported error: {message}")]
    Remote { endpoint: String, message: String },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. }
            | ApiError::Transport { endpoint, .. }
            | ApiError::MalformedResponse { endpoint, .. }
            | ApiError::Remote { endpoint, .. } => endpoint,
        }
    }
}

/// Input that is rejected locally before any request is issued.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown table '{name}'")]
    UnknownTable { name: String },
    #[error("Malformed numeric input for '{field}': {input}")]
    MalformedNumber { field: String, input: String },
    #[error("Filter '{field}' expects a {expected} value")]
    FilterKindMismatch { field: String, expected: String },
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },
    #[error("Unknown sort key '{name}'")]
    UnknownSortKey { name: String },
    #[error("Page size must be greater than 0")]
    ZeroPageSize,
    #[error("Row height must be a positive number, got {value}")]
    InvalidRowHeight { value: f64 },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Collection file parse error at {path}: {message}")]
    CollectionParseError { path: String, message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Table formatting failed: {0}")]
    TableFormat(String),
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, hint: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Display(_) => ErrorSeverity::Low,
        }
    }

    /// True for failures that come from the remote collaborator rather than local input.
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Api(_))
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                Some("Set LEADGRID_API_KEY or pass --api-key".to_string())
            }
            AppError::Api(ApiError::Timeout { .. } | ApiError::Transport { .. }) => {
                Some("Check your network connection and the configured api_url".to_string())
            }
            AppError::Validation(ValidationError::UnknownTable { .. }) => Some(format!(
                "Known tables: {}",
                crate::api::query::TableName::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            AppError::Cli(CliError::NoDataSource { hint }) => Some(hint.clone()),
            AppError::Config(ConfigError::MissingField { hint, .. }) => Some(hint.clone()),
            _ => None,
        }
    }
}
