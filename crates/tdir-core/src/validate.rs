//! File and folder name validation.
//!
//! Checked in order: illegal characters, empty name, reserved device name.
//! Callers run this on every processed name before creating anything.

use serde::Serialize;

use crate::error::NameError;

/// Characters rejected on at least one common platform.
pub const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '|', '?', '*', '\\', '/'];

/// Device names reserved on Windows, compared case-insensitively against
/// the part of the name before the first `.`.
pub const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check whether `name` is safe to use as a file or folder name.
///
/// # Errors
///
/// Returns [`NameError::IllegalCharacter`] if the name contains any of [`ILLEGAL_CHARS`].
/// Returns [`NameError::EmptyName`] if the name is empty after trimming whitespace.
/// Returns [`NameError::ReservedName`] if the first dot-separated segment is reserved.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.contains(ILLEGAL_CHARS) {
        return Err(NameError::IllegalCharacter);
    }

    if name.trim().is_empty() {
        return Err(NameError::EmptyName);
    }

    // Only the first segment: "a.CON.md" checks "a".
    let stem = name.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        return Err(NameError::ReservedName { name: stem });
    }

    Ok(())
}

/// `{valid, error?}` view of [`validate_name`], for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NameVerdict {
    #[must_use]
    pub fn of(name: &str) -> Self {
        match validate_name(name) {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}
