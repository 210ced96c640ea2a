use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("{field} {{{value}}} does not exist")]
    Validation { field: &'static str, value: String },
    #[error("mock not found: {id}")]
    NotFound { id: String },
    #[error("invalid id: {message}")]
    InvalidId { message: String },
    #[error("corrupt mock {id}: {message}")]
    CorruptData { id: String, message: String },
    #[error("list failed: {message}")]
    List { message: String },
    #[error("write failed for {id}: {message}")]
    Write { id: String, message: String },
    #[error("delete failed for {id}: {message}")]
    Delete { id: String, message: String },
}

impl From<crate::types::IdError> for MockError {
    fn from(value: crate::types::IdError) -> Self {
        MockError::InvalidId {
            message: value.to_string(),
        }
    }
}
