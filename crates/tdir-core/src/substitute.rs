//! Composition of fixed-token resolution and sequence allocation.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::sequence::{allocate, NUMBER_TOKEN};
use crate::variables::resolve;

/// Output of [`substitute_detailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub text: String,
    /// The sequence number used for `{{+Number}}`, if the marker was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_sequence: Option<String>,
}

/// Resolve every placeholder in `template`.
///
/// Fixed tokens are expanded first using `now`. If `{{+Number}}` survives
/// that pass, the resolved text (minus the marker) is matched against
/// `siblings` to pick the number. Never fails; unknown tokens stay literal.
/// The result is not validated.
#[must_use]
pub fn substitute_detailed<S: AsRef<str>>(
    template: &str,
    now: NaiveDateTime,
    siblings: &[S],
) -> Substitution {
    debug!(template, "substituting");
    let resolved = resolve(template, now);
    debug!(resolved = %resolved, "fixed tokens resolved");

    if !resolved.contains(NUMBER_TOKEN) {
        return Substitution {
            text: resolved,
            used_sequence: None,
        };
    }

    let allocation = allocate(&resolved, siblings);
    debug!(text = %allocation.text, number = %allocation.number, "sequence allocated");
    Substitution {
        text: allocation.text,
        used_sequence: Some(allocation.number),
    }
}

/// [`substitute_detailed`], keeping only the text.
#[must_use]
pub fn substitute<S: AsRef<str>>(template: &str, now: NaiveDateTime, siblings: &[S]) -> String {
    substitute_detailed(template, now, siblings).text
}
