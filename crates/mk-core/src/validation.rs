use crate::error::MockError;
use crate::reference::{is_charset, is_content_type, is_status_code};
use crate::types::mock::{MockCandidate, RawStatus};

pub const FIELD_STATUS: &str = "status";
pub const FIELD_CONTENT_TYPE: &str = "content type";
pub const FIELD_CHARSET: &str = "charset";

pub fn validate_status(status: &RawStatus) -> Result<u16, MockError> {
    match status {
        RawStatus::Code(code) if is_status_code(*code) => Ok(*code),
        RawStatus::Code(code) => Err(MockError::Validation {
            field: FIELD_STATUS,
            value: code.to_string(),
        }),
        RawStatus::Invalid(value) => Err(MockError::Validation {
            field: FIELD_STATUS,
            value: value.clone(),
        }),
    }
}

pub fn validate_content_type(content_type: &str) -> Result<(), MockError> {
    if is_content_type(content_type) {
        return Ok(());
    }
    Err(MockError::Validation {
        field: FIELD_CONTENT_TYPE,
        value: content_type.to_string(),
    })
}

pub fn validate_charset(charset: &str) -> Result<(), MockError> {
    if is_charset(charset) {
        return Ok(());
    }
    Err(MockError::Validation {
        field: FIELD_CHARSET,
        value: charset.to_string(),
    })
}

/// Checks status, content type and charset in that order; the first failure is
/// reported. Returns the accepted status code.
pub fn validate_candidate(candidate: &MockCandidate) -> Result<u16, MockError> {
    let status = validate_status(&candidate.status)?;
    validate_content_type(&candidate.content_type)?;
    validate_charset(&candidate.charset)?;
    Ok(status)
}
