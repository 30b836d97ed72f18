//! Student name formatting for roster, search and extra rows.

use std::sync::OnceLock;

use regex::Regex;

static YEAR_RE: OnceLock<Regex> = OnceLock::new();

fn year_re() -> &'static Regex {
    YEAR_RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("valid year regex"))
}

/// Row layout, picked from the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Abbreviated name, no year badge
    Narrow,
    /// Full name with the birth year as a separate badge
    Wide,
}

impl Layout {
    pub fn for_width(width: u16, narrow_below: u16) -> Self {
        if width < narrow_below {
            Layout::Narrow
        } else {
            Layout::Wide
        }
    }
}

/// Remove every four-digit run and collapse the remaining whitespace.
pub fn strip_years(name: &str) -> String {
    year_re()
        .replace_all(name, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Ivan Petrov 2012" -> "Ivan P."
///
/// With a single remaining word the word is returned as is.
pub fn abbreviate(name: &str) -> String {
    let stripped = year_re().replace_all(name, "");
    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    match tokens.as_slice() {
        [first, second, ..] => match second.chars().next() {
            Some(initial) => format!("{} {}.", first, initial),
            None => first.to_string(),
        },
        _ => tokens.join(" "),
    }
}

/// Name label and optional year badge for one row.
pub fn name_parts(name: &str, birth_year: Option<i32>, layout: Layout) -> (String, Option<String>) {
    match layout {
        Layout::Narrow => (abbreviate(name), None),
        Layout::Wide => (strip_years(name), birth_year.map(|y| y.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("Ivan Petrov 2012"), "Ivan P.");
        assert_eq!(abbreviate("Ivan Petrov Sergeevich"), "Ivan P.");
        assert_eq!(abbreviate("Madonna"), "Madonna");
        assert_eq!(abbreviate("2012"), "");
        assert_eq!(abbreviate("  Анна   Смирнова "), "Анна С.");
    }

    #[test]
    fn test_years_stripped_anywhere() {
        assert_eq!(strip_years("2011 Oleg Sidorov"), "Oleg Sidorov");
        assert_eq!(abbreviate("2011 Oleg 2012 Sidorov"), "Oleg S.");
        // Non-ASCII digits are left alone
        assert_eq!(strip_years("Oleg ٢٠١١"), "Oleg ٢٠١١");
    }

    #[test]
    fn test_name_parts_by_layout() {
        assert_eq!(
            name_parts("Ivan Petrov 2012", Some(2012), Layout::Narrow),
            ("Ivan P.".to_string(), None)
        );
        assert_eq!(
            name_parts("Ivan Petrov 2012", Some(2012), Layout::Wide),
            ("Ivan Petrov".to_string(), Some("2012".to_string()))
        );
        assert_eq!(
            name_parts("Anna Smirnova", None, Layout::Wide),
            ("Anna Smirnova".to_string(), None)
        );
    }

    #[test]
    fn test_layout_threshold() {
        assert_eq!(Layout::for_width(79, 80), Layout::Narrow);
        assert_eq!(Layout::for_width(80, 80), Layout::Wide);
    }
}
