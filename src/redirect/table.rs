//! Redirect lookup.
//!
//! # Responsibilities
//! - Store compiled rules in evaluation order
//! - Resolve a request path to the first matching rule
//! - Render the `Location` and pick the status code
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in list order; first match wins
//! - Explicit `None` for pass-through rather than a silent default

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::RedirectRule;
use crate::redirect::pattern::{Destination, PathPattern, PatternError};

/// A rule that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirect #{index} ({pattern}): {error}")]
pub struct RuleError {
    /// Position of the rule in the configured list.
    pub index: usize,
    /// The rule's source pattern as written.
    pub pattern: String,
    #[source]
    pub error: PatternError,
}

/// A rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: RedirectRule,
    source: PathPattern,
    destination: Destination,
}

impl CompiledRule {
    /// Compile the rule at position `index`.
    pub fn compile(index: usize, rule: &RedirectRule) -> Result<Self, RuleError> {
        let wrap = |error| RuleError {
            index,
            pattern: rule.source.clone(),
            error,
        };
        let source = PathPattern::parse(&rule.source).map_err(wrap)?;
        let destination = Destination::parse(&rule.destination, &source).map_err(wrap)?;
        Ok(Self {
            rule: rule.clone(),
            source,
            destination,
        })
    }

    pub fn rule(&self) -> &RedirectRule {
        &self.rule
    }

    pub fn status(&self) -> StatusCode {
        if self.rule.permanent {
            StatusCode::PERMANENT_REDIRECT
        } else {
            StatusCode::TEMPORARY_REDIRECT
        }
    }
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Index of the rule that fired.
    pub rule: usize,
    /// Value for the `Location` header.
    pub location: String,
    /// 308 for permanent rules, 307 otherwise.
    pub status: StatusCode,
}

impl Redirect {
    pub fn is_permanent(&self) -> bool {
        self.status == StatusCode::PERMANENT_REDIRECT
    }
}

/// Ordered, immutable set of compiled redirect rules.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    rules: Vec<CompiledRule>,
}

impl RedirectTable {
    /// Compile every rule, failing on the first malformed one.
    pub fn compile(rules: &[RedirectRule]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &RedirectRule> {
        self.rules.iter().map(CompiledRule::rule)
    }

    /// Find the first rule matching `path` and build the redirect. An incoming
    /// query string is carried over to the destination.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Option<Redirect> {
        self.rules.iter().enumerate().find_map(|(index, compiled)| {
            let captures = compiled.source.matches(path)?;
            let location = compiled.destination.render(&captures);
            Some(Redirect {
                rule: index,
                location: append_query(location, query),
                status: compiled.status(),
            })
        })
    }
}

fn append_query(location: String, query: Option<&str>) -> String {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return location;
    };
    let (base, fragment) = match location.find('#') {
        Some(i) => location.split_at(i),
        None => (location.as_str(), ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}{fragment}")
}
