use thiserror::Error;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 50;
pub const MAX_HTML_BYTES: i64 = 10 * 1024 * 1024;
pub const HTML_EXTENSION: &str = ".html";

/// Recoverable user-input failures. The user is re-prompted and the
/// conversation state is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("site names may only contain letters, digits and hyphens")]
    NameFormat,
    #[error("site names must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters long")]
    NameLength,
    #[error("only .html files can be deployed")]
    FileExtension,
    #[error("the file is too large, the limit is 10 MiB")]
    FileTooLarge,
}

/// Validates a candidate site name. The charset guard runs before the
/// length guard, so `""` reports a format problem, not a length one.
pub fn validate_site_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::NameFormat);
    }
    if name.len() < NAME_MIN_LEN || name.len() > NAME_MAX_LEN {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}

/// Validates an uploaded document before any network round-trip:
/// extension first, then size. A missing size is accepted and left for
/// the download to bound.
pub fn validate_html_upload(file_name: &str, file_size: Option<i64>) -> Result<(), ValidationError> {
    if !file_name.ends_with(HTML_EXTENSION) {
        return Err(ValidationError::FileExtension);
    }
    if file_size.is_some_and(|size| size > MAX_HTML_BYTES) {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}
