//! Auto-increment allocation for the `{{+Number}}` marker.
//!
//! The number picked for a name is one more than the highest number already
//! used by a sibling with the same surrounding text. Gaps are never refilled.

use serde::Serialize;

/// The auto-increment marker. Resolved only after every fixed token.
pub const NUMBER_TOKEN: &str = "{{+Number}}";

/// Width that sequence numbers are zero-padded to.
const NUMBER_WIDTH: usize = 2;

/// Result of [`allocate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// The template with every marker replaced.
    pub text: String,
    /// The rendered number that was substituted.
    pub number: String,
}

/// Literal text around the first marker; later markers are dropped.
#[derive(Debug)]
struct NumberPattern<'a> {
    prefix: &'a str,
    suffix: String,
}

impl<'a> NumberPattern<'a> {
    fn new(template: &'a str) -> Self {
        match template.split_once(NUMBER_TOKEN) {
            Some((prefix, rest)) => Self {
                prefix,
                suffix: rest.replace(NUMBER_TOKEN, ""),
            },
            None => Self {
                prefix: template,
                suffix: String::new(),
            },
        }
    }

    /// The number in `name` if it is `<prefix><two digits><suffix>`.
    fn number_in(&self, name: &str) -> Option<u32> {
        let digits = name
            .strip_prefix(self.prefix)?
            .strip_suffix(self.suffix.as_str())?;
        if digits.len() != NUMBER_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().filter(|n| *n > 0)
    }
}

/// Render a sequence number zero-padded to two digits. Wider numbers keep
/// their natural width.
#[must_use]
pub fn render_number(n: u32) -> String {
    format!("{n:0width$}", width = NUMBER_WIDTH)
}

/// The next free number for `template` among `siblings`: the highest match
/// plus one, or 1 when nothing matches.
#[must_use]
pub fn next_number<S: AsRef<str>>(template: &str, siblings: &[S]) -> u32 {
    let pattern = NumberPattern::new(template);
    siblings
        .iter()
        .filter_map(|name| pattern.number_in(name.as_ref()))
        .max()
        .map_or(1, |highest| highest.saturating_add(1))
}

/// Replace every `{{+Number}}` in `template` with the next free number.
///
/// `template` should already have its fixed tokens resolved, since the text
/// around the marker is what sibling names are matched against. A template
/// without the marker is returned unchanged alongside the number it would
/// have received.
#[must_use]
pub fn allocate<S: AsRef<str>>(template: &str, siblings: &[S]) -> Allocation {
    let number = render_number(next_number(template, siblings));
    Allocation {
        text: template.replace(NUMBER_TOKEN, &number),
        number,
    }
}
