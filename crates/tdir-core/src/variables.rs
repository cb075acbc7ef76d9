//! Fixed placeholder tokens and their expansion.
//!
//! A fixed token is `{{name}}` where `name` is one of the entries in
//! [`FIXED_TOKENS`]. Its value depends only on the instant passed to
//! [`resolve`] or on a static table, never on directory contents.
//! Anything else between braces, including `{{+Number}}`, is copied through.

use chrono::{Datelike, NaiveDateTime};
use uuid::Uuid;

/// Weekday labels in ISO order: index 0 is Monday, index 6 is Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A recognized fixed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedToken {
    /// `YYYY-MM-DD`
    Date,
    /// Full English weekday name of the instant.
    DayName,
    Year,
    Month,
    Day,
    /// `HH:MM`, 24-hour.
    Time,
    Hour,
    Minute,
    /// Static label, 1 = Monday .. 7 = Sunday.
    WeekDay(u8),
    /// Fresh random v4 identifier per occurrence.
    Uuid,
}

/// Token names as they appear between `{{` and `}}`. Case-sensitive.
pub const FIXED_TOKENS: [(&str, FixedToken); 16] = [
    ("date", FixedToken::Date),
    ("dayName", FixedToken::DayName),
    ("year", FixedToken::Year),
    ("month", FixedToken::Month),
    ("day", FixedToken::Day),
    ("time", FixedToken::Time),
    ("hour", FixedToken::Hour),
    ("minute", FixedToken::Minute),
    ("weekDay1", FixedToken::WeekDay(1)),
    ("weekDay2", FixedToken::WeekDay(2)),
    ("weekDay3", FixedToken::WeekDay(3)),
    ("weekDay4", FixedToken::WeekDay(4)),
    ("weekDay5", FixedToken::WeekDay(5)),
    ("weekDay6", FixedToken::WeekDay(6)),
    ("weekDay7", FixedToken::WeekDay(7)),
    ("uuid", FixedToken::Uuid),
];

impl FixedToken {
    /// Look up a token by the text between the braces.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FIXED_TOKENS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, token)| *token)
    }

    /// Render this token for the given instant.
    #[must_use]
    pub fn render(self, now: NaiveDateTime) -> String {
        match self {
            Self::Date => now.format("%Y-%m-%d").to_string(),
            Self::DayName => {
                WEEKDAY_NAMES[now.weekday().num_days_from_monday() as usize].to_string()
            }
            Self::Year => now.format("%Y").to_string(),
            Self::Month => now.format("%m").to_string(),
            Self::Day => now.format("%d").to_string(),
            Self::Time => now.format("%H:%M").to_string(),
            Self::Hour => now.format("%H").to_string(),
            Self::Minute => now.format("%M").to_string(),
            Self::WeekDay(n) => WEEKDAY_NAMES[usize::from(n.clamp(1, 7) - 1)].to_string(),
            Self::Uuid => Uuid::new_v4().hyphenated().to_string(),
        }
    }
}

/// Longest name in [`FIXED_TOKENS`].
const MAX_TOKEN_NAME_LEN: usize = 8;

/// Match a fixed token at the start of `text`, which begins with `{{`.
/// Returns the token and the byte length of the whole `{{name}}` marker.
fn fixed_token_at(text: &str) -> Option<(FixedToken, usize)> {
    let inner = text.strip_prefix("{{")?;
    // Only look as far as the longest name could reach.
    let window = &inner.as_bytes()[..inner.len().min(MAX_TOKEN_NAME_LEN + 2)];
    let close = window.windows(2).position(|pair| pair == b"}}")?;
    let token = FixedToken::from_name(&inner[..close])?;
    Some((token, close + 4))
}

/// Expand every fixed token in `input` using `now`.
///
/// Single left-to-right pass. Unknown or malformed `{{...}}` sequences and
/// the `{{+Number}}` marker are left as literal text. Never fails.
#[must_use]
pub fn resolve(input: &str, now: NaiveDateTime) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        match fixed_token_at(candidate) {
            Some((token, len)) => {
                out.push_str(&token.render(now));
                rest = &candidate[len..];
            }
            None => {
                // Step past one brace so `{{{date}}` still finds the token.
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn is_uuid_v4(s: &str) -> bool {
        let groups: Vec<&str> = s.split('-').collect();
        let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        lens == [8, 4, 4, 4, 12]
            && s
                .chars()
                .all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c))
            && groups[2].starts_with('4')
            && groups[3].starts_with(['8', '9', 'a', 'b'])
    }

    #[test]
    fn date_hour_minute_render_for_fixed_instant() {
        let t = at(2025, 8, 30, 14, 5);
        assert_eq!(resolve("{{date}}-{{hour}}:{{minute}}", t), "2025-08-30-14:05");
    }

    #[test]
    fn calendar_and_clock_components_are_zero_padded() {
        let t = at(2025, 3, 7, 9, 4);
        assert_eq!(
            resolve("{{year}}/{{month}}/{{day}} {{time}}", t),
            "2025/03/07 09:04"
        );
    }

    #[test]
    fn day_name_follows_the_instant() {
        // 2025-08-30 is a Saturday
        assert_eq!(resolve("{{dayName}}", at(2025, 8, 30, 0, 0)), "Saturday");
        assert_eq!(resolve("{{dayName}}", at(2025, 9, 1, 0, 0)), "Monday");
    }

    #[test]
    fn week_day_labels_are_static() {
        for t in [at(2025, 8, 30, 14, 5), at(1999, 12, 31, 23, 59)] {
            assert_eq!(resolve("{{weekDay1}}/{{weekDay7}}", t), "Monday/Sunday");
            assert_eq!(
                resolve("{{weekDay2}} {{weekDay3}} {{weekDay4}} {{weekDay5}} {{weekDay6}}", t),
                "Tuesday Wednesday Thursday Friday Saturday"
            );
        }
    }

    #[test]
    fn uuid_has_v4_shape_and_differs_per_occurrence() {
        let out = resolve("{{uuid}} {{uuid}}", at(2025, 1, 1, 0, 0));
        let (a, b) = out.split_once(' ').unwrap();
        assert!(is_uuid_v4(a), "not a v4 uuid: {a}");
        assert!(is_uuid_v4(b), "not a v4 uuid: {b}");
        assert_ne!(a, b);
    }

    #[test]
    fn number_marker_and_unknown_tokens_pass_through() {
        let t = at(2025, 8, 30, 14, 5);
        assert_eq!(resolve("Week_{{+Number}}", t), "Week_{{+Number}}");
        assert_eq!(resolve("{{Date}} {{weekDay8}} {{ date }}", t), "{{Date}} {{weekDay8}} {{ date }}");
    }

    #[test]
    fn unbalanced_braces_are_left_alone() {
        let t = at(2025, 8, 30, 14, 5);
        assert_eq!(resolve("{{date", t), "{{date");
        assert_eq!(resolve("date}}", t), "date}}");
        assert_eq!(resolve("{{{date}}}", t), "{2025-08-30}");
        assert_eq!(resolve("{{{{", t), "{{{{");
        assert_eq!(resolve("", t), "");
    }

    #[test]
    fn multibyte_text_around_tokens_is_preserved() {
        let t = at(2025, 8, 30, 14, 5);
        assert_eq!(resolve("日記 {{date}} ✓", t), "日記 2025-08-30 ✓");
    }

    #[test]
    fn longest_name_bound_covers_every_token() {
        let longest = FIXED_TOKENS.iter().map(|(name, _)| name.len()).max();
        assert_eq!(longest, Some(MAX_TOKEN_NAME_LEN));
        for (name, token) in FIXED_TOKENS {
            assert_eq!(fixed_token_at(&format!("{{{{{name}}}}}rest")), Some((token, name.len() + 4)));
        }
    }

    #[test]
    fn from_name_is_case_sensitive() {
        assert_eq!(FixedToken::from_name("dayName"), Some(FixedToken::DayName));
        assert_eq!(FixedToken::from_name("dayname"), None);
        assert_eq!(FixedToken::from_name("+Number"), None);
    }

    fn token_name() -> impl Strategy<Value = &'static str> {
        // uuid is excluded: its value is random per occurrence.
        prop::sample::select(
            FIXED_TOKENS
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| *name != "uuid")
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn second_pass_is_a_no_op(text in ".{0,40}", h in 0u32..24, m in 0u32..60) {
            let t = at(2024, 2, 29, h, m);
            let once = resolve(&text, t);
            prop_assert_eq!(resolve(&once, t), once.clone());
        }

        #[test]
        fn second_pass_is_a_no_op_on_token_soup(
            parts in prop::collection::vec(
                prop_oneof![
                    token_name().prop_map(|n| format!("{{{{{n}}}}}")),
                    Just("{".to_string()),
                    Just("}".to_string()),
                    "[a-zA-Z0-9 _]{0,4}",
                ],
                0..12,
            )
        ) {
            let t = at(2025, 8, 30, 14, 5);
            let once = resolve(&parts.concat(), t);
            prop_assert_eq!(resolve(&once, t), once.clone());
        }

        #[test]
        fn tokens_resolve_independently_of_order(
            names in prop::collection::vec(token_name(), 0..10),
            sep in "[a-z ]{0,3}",
        ) {
            let t = at(2025, 8, 30, 14, 5);
            let joined: Vec<String> = names.iter().map(|n| format!("{{{{{n}}}}}")).collect();
            let whole = resolve(&joined.join(&sep), t);
            let pieces: Vec<String> = joined.iter().map(|tok| resolve(tok, t)).collect();
            prop_assert_eq!(whole, pieces.join(&sep));
        }
    }
}
