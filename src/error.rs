use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "missing input: please enter a YouTube URL or video ID";
pub const SERVICE_FALLBACK_MESSAGE: &str = "Failed to fetch comments";
pub const TRANSPORT_MESSAGE: &str = "Network error. Make sure your backend is running.";

/// Failures of the outbound call. Details are for logs only.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response from {endpoint} was not valid JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing input: please enter a YouTube URL or video ID")]
    Validation,
    #[error("service error: {}", .0.as_deref().unwrap_or(SERVICE_FALLBACK_MESSAGE))]
    Service(Option<String>),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl AnalysisError {
    /// The single message shown to the user. Transport details never leak through.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation => VALIDATION_MESSAGE.to_string(),
            Self::Service(Some(message)) => message.clone(),
            Self::Service(None) => SERVICE_FALLBACK_MESSAGE.to_string(),
            Self::Transport(_) => TRANSPORT_MESSAGE.to_string(),
        }
    }

    pub fn outcome_label(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Service(_) => "service_error",
            Self::Transport(_) => "transport_error",
        }
    }
}
