use thiserror::Error;

/// Errors surfaced by every Jenkins administration backend
#[derive(Error, Debug)]
pub enum AdminError {
    /// The script endpoint answered with a status other than 200
    #[error("Jenkins returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The request never produced a response (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// A body came back but it is not the expected envelope
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The script ran and reported `error: true`; the text is the server's `msg`
    #[error("{0}")]
    Domain(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Local user {0} already exists")]
    AlreadyExists(String),

    #[error("Local user {0} does not exist")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl AdminError {
    /// True for failures that happened before a script result could be read
    pub fn is_transport(&self) -> bool {
        matches!(self, AdminError::Transport { .. } | AdminError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
