//! Remote store error taxonomy

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    Config(String),
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    /// HTTP status of an API-level rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_status_and_message() {
        let err = StoreError::Api {
            status: 422,
            message: "unknown attribute `agee`".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "store returned 422: unknown attribute `agee`");
    }

    #[test]
    fn config_error_has_no_status() {
        assert_eq!(StoreError::Config("bad url".to_string()).status(), None);
    }
}
