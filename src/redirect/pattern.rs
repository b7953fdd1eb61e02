//! Path pattern parsing, matching and destination rendering.
//!
//! # Responsibilities
//! - Parse source patterns (`/guides/:path*`) into literal and parameter segments
//! - Match request paths against a pattern, capturing parameter values
//! - Parse destinations (paths or absolute URLs) that reference captured names
//! - Render a destination from captures
//!
//! # Design Decisions
//! - Matching is segment-based with no regex; literal segments compare ASCII
//!   case-insensitively, captures keep the request's case
//! - A single trailing slash on the request path is ignored
//! - A parameter that captures nothing also drops the `/` before it in the destination
//! - Captured text is forwarded as-is (still percent-encoded)

use thiserror::Error;

/// Errors raised while parsing a source or destination pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("path pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("empty segment in {0:?}")]
    EmptySegment(String),

    #[error("invalid parameter name {name:?} in {pattern:?}")]
    InvalidParameter { pattern: String, name: String },

    #[error("parameter :{0} is declared more than once")]
    DuplicateParameter(String),

    #[error("destination references :{0}, which the source does not declare")]
    UnknownParameter(String),

    #[error("invalid destination URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// How many path segments a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `:name`
    One,
    /// `:name?`
    Optional,
    /// `:name*`
    ZeroOrMore,
    /// `:name+`
    OneOrMore,
}

impl Repeat {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            '?' => Some(Repeat::Optional),
            '*' => Some(Repeat::ZeroOrMore),
            '+' => Some(Repeat::OneOrMore),
            _ => None,
        }
    }

    fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Repeat::One => (1, Some(1)),
            Repeat::Optional => (0, Some(1)),
            Repeat::ZeroOrMore => (0, None),
            Repeat::OneOrMore => (1, None),
        }
    }
}

/// One `/`-separated piece of a source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: String, repeat: Repeat },
}

/// A compiled source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Parameter values captured by a successful match, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: Vec<(String, Vec<String>)>,
}

impl Captures {
    /// The captured segments for `name`, joined with `/`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, segs)| segs.join("/"))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Split a path into segments, ignoring one trailing slash. `/` yields no segments.
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

impl PathPattern {
    /// Parse a source pattern such as `/reference/clients/:path*`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        }

        let mut segments = Vec::new();
        for piece in split_path(raw) {
            if piece.is_empty() {
                return Err(PatternError::EmptySegment(raw.to_string()));
            }
            let Some(param) = piece.strip_prefix(':') else {
                segments.push(Segment::Literal(piece.to_string()));
                continue;
            };

            let (name, repeat) = match param.chars().last().and_then(Repeat::from_suffix) {
                Some(repeat) => (&param[..param.len() - 1], repeat),
                None => (param, Repeat::One),
            };
            if !valid_name(name) {
                return Err(PatternError::InvalidParameter {
                    pattern: raw.to_string(),
                    name: name.to_string(),
                });
            }
            let duplicate = segments
                .iter()
                .any(|s| matches!(s, Segment::Param { name: n, .. } if n == name));
            if duplicate {
                return Err(PatternError::DuplicateParameter(name.to_string()));
            }
            segments.push(Segment::Param {
                name: name.to_string(),
                repeat,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern declares a parameter called `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param { name: n, .. } if n == name))
    }

    /// Match a request path (without query string).
    pub fn matches(&self, path: &str) -> Option<Captures> {
        if !path.starts_with('/') {
            return None;
        }
        let parts = split_path(path);
        let mut captures = Captures::default();
        if match_from(&self.segments, &parts, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }
}

fn match_from(pattern: &[Segment], parts: &[&str], captures: &mut Captures) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return parts.is_empty();
    };

    match head {
        Segment::Literal(lit) => match parts.split_first() {
            Some((part, remaining)) if part.eq_ignore_ascii_case(lit) => {
                match_from(rest, remaining, captures)
            }
            _ => false,
        },
        Segment::Param { name, repeat } => {
            let (min, max) = repeat.bounds();
            let max = max.unwrap_or(parts.len()).min(parts.len());
            if min > max {
                return false;
            }
            // Greedy: try the longest capture first.
            for take in (min..=max).rev() {
                if parts[..take].iter().any(|p| p.is_empty()) {
                    continue;
                }
                let mark = captures.values.len();
                captures.values.push((
                    name.clone(),
                    parts[..take].iter().map(|p| p.to_string()).collect(),
                ));
                if match_from(rest, &parts[take..], captures) {
                    return true;
                }
                captures.values.truncate(mark);
            }
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Param(String),
}

/// A compiled destination: an optional `scheme://authority` prefix followed by
/// path/query/fragment text with parameter references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    raw: String,
    origin: Option<String>,
    pieces: Vec<Piece>,
}

impl Destination {
    /// Parse a destination, checking every referenced name against `source`.
    pub fn parse(raw: &str, source: &PathPattern) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }

        let (origin, rest) = if raw.starts_with('/') {
            (None, raw)
        } else {
            let parsed = url::Url::parse(raw).map_err(|e| PatternError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
                return Err(PatternError::InvalidUrl {
                    url: raw.to_string(),
                    reason: "only http(s) URLs with a host are allowed".to_string(),
                });
            }
            let after_scheme = raw.find("://").map(|i| i + 3).unwrap_or(0);
            let split = raw[after_scheme..]
                .find(['/', '?', '#'])
                .map(|i| i + after_scheme)
                .unwrap_or(raw.len());
            (Some(raw[..split].to_string()), &raw[split..])
        };

        let pieces = tokenize(rest);
        for piece in &pieces {
            if let Piece::Param(name) = piece {
                if !source.declares(name) {
                    return Err(PatternError::UnknownParameter(name.clone()));
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            origin,
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_external(&self) -> bool {
        self.origin.is_some()
    }

    /// Substitute captures into the destination.
    pub fn render(&self, captures: &Captures) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Param(name) => {
                    let value = captures.get(name).unwrap_or_default();
                    if value.is_empty() {
                        if out.ends_with('/') {
                            out.pop();
                        }
                    } else {
                        out.push_str(&value);
                    }
                }
            }
        }

        match &self.origin {
            Some(origin) => format!("{origin}{out}"),
            None if out.is_empty() || !out.starts_with('/') => format!("/{out}"),
            None => out,
        }
    }
}

/// Split destination text into literal runs and `:name` references. A `*` or
/// `+` right after a name is part of the reference; `?` is left as text since
/// it usually starts a query string.
fn tokenize(text: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let starts_name = c == ':' && text[i + 1..].chars().next().is_some_and(is_name_char);
        if !starts_name {
            literal.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if !is_name_char(next) {
                break;
            }
            name.push(next);
            chars.next();
        }
        if let Some(&(_, '*' | '+')) = chars.peek() {
            chars.next();
        }
        if !literal.is_empty() {
            pieces.push(Piece::Text(std::mem::take(&mut literal)));
        }
        pieces.push(Piece::Param(name));
    }

    if !literal.is_empty() {
        pieces.push(Piece::Text(literal));
    }
    pieces
}
