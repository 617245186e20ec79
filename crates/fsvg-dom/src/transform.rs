//! Transform list parser
//!
//! Parses `transform` attribute values such as
//! `translate(10, 20) rotate(45 5 5) scale(2)` into a single affine
//! transform. Calls are composed in textual order: each call's matrix is
//! concatenated after the accumulated one, so the rightmost call is the
//! first applied to a point.

use once_cell::sync::Lazy;
use regex::Regex;
use tiny_skia::Transform;

/// One `name(args)` call
static CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\([^)]*\)").expect("transform call pattern"));

/// Function names and numbers (signed, decimal, exponent)
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z]+|[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?")
        .expect("transform word pattern")
});

/// Transform grammar errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Unknown transform type {0:?}")]
    UnknownFunction(String),

    #[error("{function} takes {expected} arguments, found {found}")]
    ArgumentCount {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("Malformed number {0:?} in transform")]
    InvalidNumber(String),
}

/// Parse a whole transform list.
///
/// Text without any call (including the empty string) yields the identity.
pub fn parse_transform(value: &str) -> Result<Transform, TransformError> {
    CALL_PATTERN
        .find_iter(value)
        .try_fold(Transform::identity(), |acc, call| {
            Ok(acc.pre_concat(parse_single_transform(call.as_str())?))
        })
}

/// Parse a single `name(args)` call.
///
/// The function name is matched case-insensitively. Angles are in degrees.
pub fn parse_single_transform(value: &str) -> Result<Transform, TransformError> {
    let mut words = WORD_PATTERN.find_iter(value).map(|m| m.as_str());

    let Some(name) = words.next() else {
        return Ok(Transform::identity());
    };
    let function = name.to_ascii_lowercase();

    let terms = words.map(parse_term).collect::<Result<Vec<f32>, _>>()?;

    let transform = match (function.as_str(), terms.as_slice()) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::from_row(a, b, c, d, e, f),
        ("translate", &[tx]) => Transform::from_translate(tx, 0.0),
        ("translate", &[tx, ty]) => Transform::from_translate(tx, ty),
        ("scale", &[s]) => Transform::from_scale(s, s),
        ("scale", &[sx, sy]) => Transform::from_scale(sx, sy),
        ("rotate", &[angle]) => Transform::from_rotate(angle),
        ("rotate", &[angle, cx, cy]) => Transform::from_translate(cx, cy)
            .pre_concat(Transform::from_rotate(angle))
            .pre_concat(Transform::from_translate(-cx, -cy)),
        ("skewx", &[angle]) => Transform::from_skew(angle.to_radians().tan(), 0.0),
        ("skewy", &[angle]) => Transform::from_skew(0.0, angle.to_radians().tan()),
        (known, _) if expected_arguments(known).is_some() => {
            return Err(TransformError::ArgumentCount {
                function: name.to_string(),
                expected: expected_arguments(known).unwrap_or_default(),
                found: terms.len(),
            });
        }
        _ => return Err(TransformError::UnknownFunction(name.to_string())),
    };

    Ok(transform)
}

fn expected_arguments(function: &str) -> Option<&'static str> {
    match function {
        "matrix" => Some("6"),
        "translate" | "scale" => Some("1 or 2"),
        "rotate" => Some("1 or 3"),
        "skewx" | "skewy" => Some("1"),
        _ => None,
    }
}

fn parse_term(term: &str) -> Result<f32, TransformError> {
    term.parse::<f64>()
        .ok()
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .ok_or_else(|| TransformError::InvalidNumber(term.to_string()))
}
