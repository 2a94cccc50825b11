//! Typed failures shared by every component.
//!
//! Each variant carries exactly the fields relevant to its failure and derives
//! its message from them. Callers branch on [`ErrorKind`] / [`TextMorphError::code`]
//! rather than on message text, and surface failures to users through
//! [`format_error_for_ui`].

use std::path::PathBuf;
use thiserror::Error;

/// Glyph prefixed to every user-facing failure.
pub const FAILURE_GLYPH: &str = "❌";

/// Code reported for failures outside the taxonomy.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Result type alias using [`TextMorphError`].
pub type Result<T> = std::result::Result<T, TextMorphError>;

/// Every failure the application reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextMorphError {
    /// Configuration file missing, unparsable, empty or incomplete.
    #[error("{message}")]
    Configuration {
        message: String,
        config_key: Option<String>,
    },

    /// API key missing or rejected.
    #[error("API key for {service} is missing or invalid")]
    ApiKey { service: String },

    #[error("{message}")]
    HuggingFaceApi {
        message: String,
        status_code: Option<u16>,
        response: Option<String>,
    },

    #[error("{message}")]
    GroqApi {
        message: String,
        status_code: Option<u16>,
        response: Option<String>,
    },

    #[error("{service} API request timed out after {timeout_secs} seconds")]
    ApiTimeout { service: String, timeout_secs: u64 },

    /// Upstream model is still warming up (HTTP 503).
    #[error("Model '{model_name}' is currently loading. Please try again in a few moments.")]
    ModelLoading { model_name: String },

    #[error("Text is too long ({current_length} chars). Maximum allowed: {max_length} characters.")]
    TextTooLong {
        current_length: usize,
        max_length: usize,
    },

    #[error("Text is too short ({current_length} chars). Minimum required: {min_length} characters.")]
    TextTooShort {
        current_length: usize,
        min_length: usize,
    },

    #[error("No text provided. Please enter some text to process.")]
    EmptyInput,

    #[error("{message}")]
    Summarization {
        message: String,
        method: Option<String>,
    },

    #[error("{message}")]
    Paraphrasing { message: String },

    #[error("{message}")]
    Pipeline {
        message: String,
        component: Option<String>,
    },

    /// Upstream rate limit hit (HTTP 429).
    #[error("Rate limit exceeded for {service}{}", retry_hint(.retry_after_secs))]
    RateLimit {
        service: String,
        retry_after_secs: Option<u64>,
    },

    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    FileOperation {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Logging { message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) if *secs > 0 => format!(". Please retry after {secs} seconds."),
        _ => String::new(),
    }
}

impl TextMorphError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: None,
        }
    }

    /// Configuration failure attributed to a specific dotted key.
    pub fn configuration_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: Some(key.into()),
        }
    }

    pub fn api_key(service: impl Into<String>) -> Self {
        Self::ApiKey {
            service: service.into(),
        }
    }

    pub fn hugging_face(
        message: impl Into<String>,
        status_code: Option<u16>,
        response: Option<String>,
    ) -> Self {
        Self::HuggingFaceApi {
            message: message.into(),
            status_code,
            response,
        }
    }

    pub fn groq(
        message: impl Into<String>,
        status_code: Option<u16>,
        response: Option<String>,
    ) -> Self {
        Self::GroqApi {
            message: message.into(),
            status_code,
            response,
        }
    }

    pub fn api_timeout(service: impl Into<String>, timeout_secs: u64) -> Self {
        Self::ApiTimeout {
            service: service.into(),
            timeout_secs,
        }
    }

    pub fn model_loading(model_name: impl Into<String>) -> Self {
        Self::ModelLoading {
            model_name: model_name.into(),
        }
    }

    pub fn text_too_long(current_length: usize, max_length: usize) -> Self {
        Self::TextTooLong {
            current_length,
            max_length,
        }
    }

    pub fn text_too_short(current_length: usize, min_length: usize) -> Self {
        Self::TextTooShort {
            current_length,
            min_length,
        }
    }

    pub fn summarization(message: impl Into<String>, method: Option<String>) -> Self {
        Self::Summarization {
            message: message.into(),
            method,
        }
    }

    pub fn paraphrasing(message: impl Into<String>) -> Self {
        Self::Paraphrasing {
            message: message.into(),
        }
    }

    pub fn pipeline(message: impl Into<String>, component: Option<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
            component,
        }
    }

    pub fn rate_limit(service: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimit {
            service: service.into(),
            retry_after_secs,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn file_operation(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileOperation {
            message: message.into(),
            path,
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Human-readable message, reproducible from the variant's fields alone.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Structured detail text, when the variant carries any.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Configuration { config_key, .. } => {
                config_key.as_ref().map(|key| format!("Config key: {key}"))
            }
            Self::HuggingFaceApi {
                status_code,
                response,
                ..
            }
            | Self::GroqApi {
                status_code,
                response,
                ..
            } => status_code.map(|status| status_details(status, response.as_deref())),
            Self::ModelLoading { .. } | Self::RateLimit { .. } => {
                self.status_code().map(|status| status_details(status, None))
            }
            Self::TextTooLong { .. } | Self::TextTooShort { .. } => {
                Some("Input type: text_length".to_string())
            }
            Self::EmptyInput => Some("Input type: empty_text".to_string()),
            Self::Summarization { method, .. } => method.as_ref().map(|m| format!("Method: {m}")),
            Self::Pipeline { component, .. } => {
                component.as_ref().map(|c| format!("Component: {c}"))
            }
            Self::FileOperation { path, .. } => {
                path.as_ref().map(|p| format!("File: {}", p.display()))
            }
            Self::ApiKey { .. }
            | Self::ApiTimeout { .. }
            | Self::Paraphrasing { .. }
            | Self::Network { .. }
            | Self::Logging { .. } => None,
        }
    }

    /// Message followed by details, for logs rather than end users.
    pub fn describe(&self) -> String {
        match self.details() {
            Some(details) => format!("{self}\nDetails: {details}"),
            None => self.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::ApiKey { .. } => ErrorKind::ApiKey,
            Self::HuggingFaceApi { .. } => ErrorKind::HuggingFaceApi,
            Self::GroqApi { .. } => ErrorKind::GroqApi,
            Self::ApiTimeout { .. } => ErrorKind::ApiTimeout,
            Self::ModelLoading { .. } => ErrorKind::ModelLoading,
            Self::TextTooLong { .. } => ErrorKind::TextTooLong,
            Self::TextTooShort { .. } => ErrorKind::TextTooShort,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::Summarization { .. } => ErrorKind::Summarization,
            Self::Paraphrasing { .. } => ErrorKind::Paraphrasing,
            Self::Pipeline { .. } => ErrorKind::Pipeline,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Network { .. } => ErrorKind::Network,
            Self::FileOperation { .. } => ErrorKind::FileOperation,
            Self::Logging { .. } => ErrorKind::Logging,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind().category()
    }

    /// HTTP status associated with upstream API failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HuggingFaceApi { status_code, .. } | Self::GroqApi { status_code, .. } => {
                *status_code
            }
            Self::ModelLoading { .. } => Some(503),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    /// Seconds the caller should wait before retrying, when known.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// Upstream failures that are worth retrying after a pause.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit { .. } | Self::ApiTimeout { .. } | Self::ModelLoading { .. }
        )
    }

    /// Startup failures: the host must halt rather than serve requests.
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

fn status_details(status: u16, response: Option<&str>) -> String {
    match response {
        Some(response) => format!("Status: {status}, Response: {response}"),
        None => format!("Status: {status}"),
    }
}

/// Tag of a [`TextMorphError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    ApiKey,
    HuggingFaceApi,
    GroqApi,
    ApiTimeout,
    ModelLoading,
    TextTooLong,
    TextTooShort,
    EmptyInput,
    Summarization,
    Paraphrasing,
    Pipeline,
    RateLimit,
    Network,
    FileOperation,
    Logging,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 16] = [
        ErrorKind::Configuration,
        ErrorKind::ApiKey,
        ErrorKind::HuggingFaceApi,
        ErrorKind::GroqApi,
        ErrorKind::ApiTimeout,
        ErrorKind::ModelLoading,
        ErrorKind::TextTooLong,
        ErrorKind::TextTooShort,
        ErrorKind::EmptyInput,
        ErrorKind::Summarization,
        ErrorKind::Paraphrasing,
        ErrorKind::Pipeline,
        ErrorKind::RateLimit,
        ErrorKind::Network,
        ErrorKind::FileOperation,
        ErrorKind::Logging,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::ApiKey => "API_KEY_ERROR",
            ErrorKind::HuggingFaceApi => "HF_API_ERROR",
            ErrorKind::GroqApi => "GROQ_API_ERROR",
            ErrorKind::ApiTimeout => "API_TIMEOUT",
            ErrorKind::ModelLoading => "MODEL_LOADING",
            ErrorKind::TextTooLong => "TEXT_TOO_LONG",
            ErrorKind::TextTooShort => "TEXT_TOO_SHORT",
            ErrorKind::EmptyInput => "EMPTY_INPUT",
            ErrorKind::Summarization => "SUMMARIZATION_ERROR",
            ErrorKind::Paraphrasing => "PARAPHRASING_ERROR",
            ErrorKind::Pipeline => "PIPELINE_ERROR",
            ErrorKind::RateLimit => "RATE_LIMIT_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::FileOperation => "FILE_ERROR",
            ErrorKind::Logging => "LOGGING_ERROR",
        }
    }

    /// Display name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::ApiKey => "APIKeyError",
            ErrorKind::HuggingFaceApi => "HuggingFaceAPIError",
            ErrorKind::GroqApi => "GROQAPIError",
            ErrorKind::ApiTimeout => "APITimeoutError",
            ErrorKind::ModelLoading => "ModelLoadingError",
            ErrorKind::TextTooLong => "TextTooLongError",
            ErrorKind::TextTooShort => "TextTooShortError",
            ErrorKind::EmptyInput => "EmptyInputError",
            ErrorKind::Summarization => "SummarizationError",
            ErrorKind::Paraphrasing => "ParaphrasingError",
            ErrorKind::Pipeline => "PipelineError",
            ErrorKind::RateLimit => "RateLimitError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::FileOperation => "FileOperationError",
            ErrorKind::Logging => "LoggingError",
        }
    }

    pub const fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::Configuration => ErrorCategory::Configuration,
            ErrorKind::TextTooLong | ErrorKind::TextTooShort | ErrorKind::EmptyInput => {
                ErrorCategory::InputValidation
            }
            ErrorKind::ApiKey
            | ErrorKind::HuggingFaceApi
            | ErrorKind::GroqApi
            | ErrorKind::ApiTimeout
            | ErrorKind::ModelLoading
            | ErrorKind::RateLimit
            | ErrorKind::Network => ErrorCategory::UpstreamApi,
            ErrorKind::Summarization | ErrorKind::Paraphrasing | ErrorKind::Pipeline => {
                ErrorCategory::Processing
            }
            ErrorKind::FileOperation | ErrorKind::Logging => ErrorCategory::FileSystem,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error category for classification and handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Fatal at startup.
    Configuration,
    /// Rejected request; recoverable.
    InputValidation,
    /// Reported to the user; some kinds carry a retry hint.
    UpstreamApi,
    Processing,
    /// Degrades to a reduced feature set.
    FileSystem,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::InputValidation => write!(f, "Input Validation"),
            Self::UpstreamApi => write!(f, "Upstream API"),
            Self::Processing => write!(f, "Processing"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Standardized code for any failure; `UNKNOWN_ERROR` outside the taxonomy.
pub fn error_code(err: &(dyn std::error::Error + 'static)) -> &'static str {
    err.downcast_ref::<TextMorphError>()
        .map_or(UNKNOWN_ERROR_CODE, TextMorphError::code)
}

/// Render any failure for display to an end user.
///
/// Taxonomy members show only their message; anything else is prefixed with a
/// generic notice. Details (status codes, raw responses) are never included.
pub fn format_error_for_ui(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<TextMorphError>() {
        Some(err) => format!("{FAILURE_GLYPH} {err}"),
        None => format!("{FAILURE_GLYPH} An error occurred: {err}"),
    }
}
