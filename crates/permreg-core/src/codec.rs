//! The canonical `service:action` textual form.
//!
//! This is the encoding consumed by registration calls and produced by
//! listing calls, both on the wire and in storage.

use crate::error::{ParseError, ValidationError};

/// Separator between the service and the action.
pub const SEPARATOR: char = ':';

/// Check the shape of a raw permission string.
///
/// Reports *why* the string is malformed, which `parse` does not.
pub fn validate(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !raw.contains(SEPARATOR) {
        return Err(ValidationError::MissingSeparator);
    }

    let mut parts = raw.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(service), Some(action), None) if !service.is_empty() && !action.is_empty() => Ok(()),
        _ => Err(ValidationError::WrongArity),
    }
}

/// Split a raw permission string into `(service, action)`.
pub fn parse(raw: &str) -> Result<(&str, &str), ParseError> {
    match raw.split_once(SEPARATOR) {
        Some((service, action))
            if !service.is_empty() && !action.is_empty() && !action.contains(SEPARATOR) =>
        {
            Ok((service, action))
        }
        _ => Err(ParseError::InvalidFormat {
            raw: raw.to_string(),
        }),
    }
}

/// Join a service and an action into the canonical form.
pub fn format(service: &str, action: &str) -> String {
    let mut out = String::with_capacity(service.len() + action.len() + 1);
    out.push_str(service);
    out.push(SEPARATOR);
    out.push_str(action);
    out
}
