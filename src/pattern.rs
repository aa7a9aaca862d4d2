//! Pattern lexing: splitting a pattern into segments and classifying each one.

pub(crate) const PARAM_START: &str = ":";
pub(crate) const WILDCARD_PARAM_START: &str = "*";
pub(crate) const PREFIX_PARAM_START: &str = "+:";
pub(crate) const SUFFIX_PARAM_START: &str = "-:";

pub(crate) const PATH_SEP: &str = "/";
pub(crate) const PATH_SEP_BYTE: u8 = b'/';

/// A single classified pattern segment.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Segment<'p> {
    /// Matched literally.
    Static(&'p str),
    /// `:name`: the whole request segment becomes the parameter value.
    Named(&'p str),
    /// `*name`: consumes the rest of the request path.
    Wildcard(&'p str),
    /// `literal+:name`: the request segment must start with `literal`.
    Prefix { literal: &'p str, name: &'p str },
    /// `name-:literal`: the request segment must end with `literal`.
    Suffix { name: &'p str, literal: &'p str },
}

/// Splits a pattern into its segments. `/` is its own single segment; for
/// everything else one trailing separator is stripped, so `/a/` and `/a`
/// yield the same segments.
pub(crate) fn split(pattern: &str) -> Vec<&str> {
    if pattern == PATH_SEP {
        return vec![PATH_SEP];
    }

    let pattern = pattern.strip_suffix(PATH_SEP).unwrap_or(pattern);
    pattern.split(PATH_SEP).skip(1).collect()
}

/// Classifies one pattern segment by its first byte, falling back to the
/// intra-segment `+:` and `-:` tokens.
pub(crate) fn classify(segment: &str) -> Segment<'_> {
    match segment.as_bytes().first() {
        Some(b':') => Segment::Named(&segment[1..]),
        Some(b'*') => Segment::Wildcard(&segment[1..]),
        _ => {
            if let Some(at) = segment.find(PREFIX_PARAM_START) {
                Segment::Prefix {
                    literal: &segment[..at],
                    name: &segment[at + PREFIX_PARAM_START.len()..],
                }
            } else if let Some(at) = segment.find(SUFFIX_PARAM_START) {
                Segment::Suffix {
                    name: &segment[..at],
                    literal: &segment[at + SUFFIX_PARAM_START.len()..],
                }
            } else {
                Segment::Static(segment)
            }
        }
    }
}

/// The longest literal prefix of a pattern before any `:` or `*`. For a
/// wildcard pattern this is the part every matching request path starts with.
pub(crate) fn static_part(pattern: &str) -> &str {
    let at = pattern
        .find(PARAM_START)
        .or_else(|| pattern.find(WILDCARD_PARAM_START))
        .unwrap_or(pattern.len());

    &pattern[..at]
}
