//! Free-text query grammar
//!
//! A query is a comma-separated list of terms. A term prefixed with `-` must
//! not occur; every other non-empty term must occur. Matching is line based
//! over the pretty JSON produced by [`super::serialize::to_search_text`].

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// A single term pattern
#[derive(Debug, Clone)]
pub struct TermPattern {
    needle: String,
    regex: Option<Regex>,
}

impl TermPattern {
    /// Build the line pattern for an already lowercased, trimmed term
    pub fn new(needle: &str) -> Self {
        let escaped = regex::escape(needle);
        // (a) `"key": ...term...` or (b) `"...term..."` with optional trailing comma
        let pattern = format!(
            r#"^\s*(?:"[^"\n]*":.*{escaped}.*|"[^"\n]*{escaped}[^"\n]*",?)$"#
        );

        let regex = match RegexBuilder::new(&pattern)
            .multi_line(true)
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Falling back to substring match for term '{}': {}", needle, e);
                None
            }
        };

        Self {
            needle: needle.to_string(),
            regex,
        }
    }

    /// The term text this pattern searches for
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Check whether the term occurs in the search text
    pub fn is_found(&self, text: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(text),
            None => text.contains(&self.needle),
        }
    }
}

/// A parsed query term
#[derive(Debug, Clone)]
pub enum Term {
    /// Must occur
    Include(TermPattern),
    /// Must not occur
    Exclude(TermPattern),
}

/// A parsed multi-term query
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    /// Parse raw user input. Never fails; stray commas and quotes are literal.
    pub fn parse(input: &str) -> Self {
        let lowered = input.to_lowercase();
        let terms = lowered
            .split(',')
            .filter_map(|raw| {
                let raw = raw.trim();
                if let Some(rest) = raw.strip_prefix('-') {
                    let rest = rest.trim();
                    (!rest.is_empty()).then(|| Term::Exclude(TermPattern::new(rest)))
                } else {
                    (!raw.is_empty()).then(|| Term::Include(TermPattern::new(raw)))
                }
            })
            .collect();

        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// True when the query has no effective terms and matches everything
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against search text.
    ///
    /// An excluded term that occurs fails immediately. Included terms are
    /// ANDed; all of them are checked.
    pub fn matches(&self, text: &str) -> bool {
        let mut matched = true;
        for term in &self.terms {
            match term {
                Term::Exclude(pattern) => {
                    if pattern.is_found(text) {
                        return false;
                    }
                }
                Term::Include(pattern) => {
                    if !pattern.is_found(text) {
                        matched = false;
                    }
                }
            }
        }
        matched
    }
}
