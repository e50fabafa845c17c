use jenkins_core::AdminError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Protocol(String),

    /// The script reported `error: true`
    #[error("{0}")]
    Script(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, JenkinsError>;

impl From<JenkinsError> for AdminError {
    fn from(err: JenkinsError) -> Self {
        match err {
            JenkinsError::Http(e) => AdminError::Http(e.to_string()),
            JenkinsError::Io(e) => AdminError::Io(e.to_string()),
            JenkinsError::Status { status, body } => AdminError::Transport { status, body },
            JenkinsError::Envelope(e) => AdminError::Protocol(e.to_string()),
            JenkinsError::Protocol(msg) => AdminError::Protocol(msg),
            JenkinsError::Script(msg) => AdminError::Domain(msg),
            JenkinsError::Template(e) => AdminError::Template(e.to_string()),
            JenkinsError::InvalidInput(msg) => AdminError::InvalidInput(msg),
        }
    }
}
