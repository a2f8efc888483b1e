//! Request matching logic.
//!
//! # Responsibilities
//! - Match the request host (exact, case-insensitive)
//! - Match the full request URI (exact, case-sensitive)
//! - Evaluate regex patterns and caller-supplied predicates
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec); URI matching is
//!   case-sensitive
//! - Rules are resolved to a concrete variant once at registration time,
//!   never re-inspected per call
//! - A registration with no rule matches every request (wildcard)
//! - A request whose host cannot be determined never matches a host rule

use std::fmt;

pub use regex::Regex;

/// A single match rule, resolved at registration time.
///
/// Construct via the `From` conversions (`&str`/`String` for exact match,
/// [`Regex`] for a pattern) or [`MatchRule::predicate`] for an arbitrary
/// callback.
pub enum MatchRule {
    /// Exact string equality.
    Exact(String),
    /// Regular-expression match.
    Pattern(Regex),
    /// Arbitrary predicate; a `true` return means match.
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl MatchRule {
    /// Wrap a caller-supplied predicate as a match rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        MatchRule::Predicate(Box::new(f))
    }

    pub(crate) fn evaluate(&self, value: &str) -> bool {
        match self {
            MatchRule::Exact(expected) => expected == value,
            MatchRule::Pattern(pattern) => pattern.is_match(value),
            MatchRule::Predicate(f) => f(value),
        }
    }

    /// Normalize an exact rule for case-insensitive host comparison.
    /// Patterns and predicates see the lowercased host at evaluation time.
    fn lowercased(self) -> Self {
        match self {
            MatchRule::Exact(expected) => MatchRule::Exact(expected.to_lowercase()),
            other => other,
        }
    }
}

impl From<&str> for MatchRule {
    fn from(expected: &str) -> Self {
        MatchRule::Exact(expected.to_owned())
    }
}

impl From<String> for MatchRule {
    fn from(expected: String) -> Self {
        MatchRule::Exact(expected)
    }
}

impl From<Regex> for MatchRule {
    fn from(pattern: Regex) -> Self {
        MatchRule::Pattern(pattern)
    }
}

impl fmt::Debug for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::Exact(expected) => f.debug_tuple("Exact").field(expected).finish(),
            MatchRule::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            MatchRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Compiled matcher for one registration: which part of the request the
/// rule applies to, or a wildcard.
#[derive(Debug)]
pub(crate) enum Matcher {
    /// Matches every request.
    All,
    /// Rule over the request host.
    Host(MatchRule),
    /// Rule over the full request URI.
    Uri(MatchRule),
}

impl Matcher {
    pub(crate) fn host(rule: MatchRule) -> Self {
        Matcher::Host(rule.lowercased())
    }

    pub(crate) fn uri(rule: MatchRule) -> Self {
        Matcher::Uri(rule)
    }

    /// Returns true if the request identified by `host`/`uri` should be
    /// routed to this registration's handler.
    pub(crate) fn matches(&self, host: Option<&str>, uri: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Host(rule) => match host {
                Some(host) => rule.evaluate(&host.to_lowercase()),
                None => false,
            },
            Matcher::Uri(rule) => rule.evaluate(uri),
        }
    }
}
