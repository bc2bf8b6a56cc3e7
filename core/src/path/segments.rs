//! Dotted path parser.
//!
//! Splits paths like `server.tls.cert` into key segments. A literal dot
//! inside a key is written as `\.`, so `hosts.example\.com.port` addresses
//! the key `example.com` under `hosts`.
//!
//! Paths that name a key from [`BLOCKED_KEYS`] anywhere along the way parse
//! to an empty segment list and are treated as invalid by every accessor.

use std::fmt;


/// Keys that can never appear as a path segment.
pub const BLOCKED_KEYS: [&str; 3] = ["__proto__", "prototype", "constructor"];


/// A dotted path split into its unescaped key segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// Parse a dotted string into segments.
    ///
    /// Never fails: a path containing a blocked key yields an empty
    /// segment list, and `""` yields a single empty segment. Use
    /// [`DottedPath::is_usable`] to tell real paths from those two.
    pub fn parse(input: &str) -> Self {
        DottedPath {
            segments: parse_segments(input),
        }
    }

    /// Build a path from already-unescaped key segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        DottedPath { segments }
    }

    /// The unescaped key segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True if the path was rejected because it names a blocked key.
    pub fn is_blocked(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if the path addresses something: not blocked and not the
    /// lone empty segment an empty input string produces.
    pub fn is_usable(&self) -> bool {
        match self.segments.as_slice() {
            [] => false,
            [only] => !only.is_empty(),
            _ => true,
        }
    }

    /// Format back to a dotted string, re-escaping dots inside keys.
    pub fn to_dotted(&self) -> String {
        self.segments
            .iter()
            .map(|seg| seg.replace('.', "\\."))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}


/// Split a dotted path on unescaped dots.
///
/// A piece ending in `\` is joined with the piece after it by a literal
/// `.`; this repeats while the joined piece still ends in `\`. A trailing
/// `\` with nothing after it stays in the key as-is.
///
/// Returns an empty vector if any resulting segment is in [`BLOCKED_KEYS`].
pub fn parse_segments(input: &str) -> Vec<String> {
    let pieces: Vec<&str> = input.split('.').collect();
    let mut segments = Vec::with_capacity(pieces.len());

    let mut i = 0;
    while i < pieces.len() {
        let mut segment = pieces[i].to_string();
        while segment.ends_with('\\') && i + 1 < pieces.len() {
            segment.pop();
            segment.push('.');
            i += 1;
            segment.push_str(pieces[i]);
        }
        segments.push(segment);
        i += 1;
    }

    if segments.iter().any(|seg| is_blocked_key(seg)) {
        return Vec::new();
    }
    segments
}


/// Check a single key against the blocklist.
pub fn is_blocked_key(key: &str) -> bool {
    BLOCKED_KEYS.contains(&key)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
