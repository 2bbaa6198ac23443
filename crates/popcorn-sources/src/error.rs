use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a usable HTTP response
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered but reported no matching title (`Response: "False"`)
    #[error("{0}")]
    NotFound(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}
