//! Translation of file names and glob patterns into Drive queries.
//!
//! The Drive query language only offers `=` and `contains` over names, so a
//! glob is split in two: a server-side filter that returns a superset of the
//! matches, and an anchored, case-insensitive regex that decides the exact
//! match on the client.
//!
//! | pattern     | server filter              | client matcher   |
//! |-------------|----------------------------|------------------|
//! | `report.csv`| `name = 'report.csv'`      | none             |
//! | `*draft*`   | `name contains 'draft'`    | `^.*draft.*$`    |
//! | `draft*`    | `name contains 'draft'`    | `^draft.*$`      |
//! | `*.csv`     | `trashed = false`          | `^.*\.csv$`      |
//! | `a?c`       | `trashed = false`          | `^a.c$`          |

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Characters that mark a name as a glob pattern.
const GLOB_CHARS: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Filter used when nothing about the pattern can narrow the listing.
pub const FALLBACK_FILTER: &str = "trashed = false";

/// Returns true if `name` contains any glob metacharacter.
///
/// This is purely syntactic; the pattern is not checked for well-formedness.
pub fn is_pattern(name: &str) -> bool {
    name.contains(GLOB_CHARS)
}

/// Escape a value for interpolation inside a single-quoted query string.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A server-side filter plus an optional exact-match predicate.
///
/// When `matcher` is present every listed file must also satisfy it; when it
/// is absent the server-side filter is authoritative.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    filter: String,
    matcher: Option<Regex>,
}

impl QueryPlan {
    /// Plan for an exact (non-pattern) name.
    pub fn literal(name: &str) -> Self {
        Self {
            filter: format!("name = '{}'", escape_query_value(name)),
            matcher: None,
        }
    }

    /// Build the plan for `name`, translating it if it is a pattern.
    pub fn for_name(name: &str) -> Result<Self> {
        if is_pattern(name) {
            translate(name)
        } else {
            Ok(Self::literal(name))
        }
    }

    /// The server-side filter fragment.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The exact-match predicate, present only for glob patterns.
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    /// Full query restricted to files whose parents include `container`.
    pub fn scoped_to(&self, container: &str) -> String {
        format!(
            "'{}' in parents and {}",
            escape_query_value(container),
            self.filter
        )
    }

    /// Whether a listed file name is a real match under this plan.
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.as_ref().map_or(true, |re| re.is_match(name))
    }
}

/// Translate a glob pattern into a [`QueryPlan`].
///
/// Only `*` and `?` are wildcards in the compiled matcher; every other
/// character, including `[` and `{`, matches itself.
pub fn translate(pattern: &str) -> Result<QueryPlan> {
    let matcher = RegexBuilder::new(&glob_to_regex(pattern))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?;

    Ok(QueryPlan {
        filter: server_filter(pattern),
        matcher: Some(matcher),
    })
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

fn server_filter(pattern: &str) -> String {
    let contains = |text: &str| format!("name contains '{}'", escape_query_value(text));

    if let Some(inner) = pattern.strip_prefix('*').and_then(|p| p.strip_suffix('*')) {
        if !inner.is_empty() && !is_pattern(inner) {
            return contains(inner);
        }
        return FALLBACK_FILTER.to_string();
    }

    if pattern.starts_with('*') {
        return FALLBACK_FILTER.to_string();
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        if !is_pattern(prefix) {
            return contains(prefix);
        }
    }

    FALLBACK_FILTER.to_string()
}
