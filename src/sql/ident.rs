//! Identifier validation and quoting.
//!
//! Table and column names arrive from the URL and from JSON payload keys, and
//! identifiers cannot be bound as statement parameters. Every identifier that
//! reaches query text goes through [`quote`]: validated, then double-quoted
//! with embedded quotes doubled.

use crate::error::AppError;

/// PostgreSQL truncates identifiers at NAMEDATALEN - 1 bytes; reject instead.
const MAX_IDENT_LEN: usize = 63;

pub fn validate(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::BadRequest("identifier must not be empty".into()));
    }
    if name.contains('\0') {
        return Err(AppError::BadRequest(format!(
            "identifier contains NUL byte: {:?}",
            name
        )));
    }
    if name.len() > MAX_IDENT_LEN {
        return Err(AppError::BadRequest(format!(
            "identifier longer than {} bytes: {:?}",
            MAX_IDENT_LEN, name
        )));
    }
    Ok(())
}

pub fn quote(name: &str) -> Result<String, AppError> {
    validate(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}
