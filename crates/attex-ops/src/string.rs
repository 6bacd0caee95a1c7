use attex_core::error::AttexError;
use attex_core::value::Value;
use regex::{NoExpand, Regex};

/// Leading characters that mark a `replace` pattern as a regex even without
/// `/…/` delimiters (legacy heuristic, kept for compatibility).
const REGEX_LEADERS: &[char] = &['[', '\\', '^', '$', '.', '|', '?', '*', '+', '(', ')'];

pub fn to_lower_case(value: &Value) -> Value {
    Value::Str(value.safe_to_string().to_lowercase())
}

pub fn to_upper_case(value: &Value) -> Value {
    Value::Str(value.safe_to_string().to_uppercase())
}

pub fn trim(value: &Value) -> Value {
    Value::Str(value.safe_to_string().trim().to_string())
}

/// Character-indexed substring. `end < start` swaps the bounds (legacy JS
/// semantics); out-of-range indices clamp, and a fully out-of-range `start`
/// yields the empty string.
pub fn substring(value: &Value, start: usize, end: Option<usize>) -> Value {
    let chars: Vec<char> = value.safe_to_string().chars().collect();
    let (mut lo, mut hi) = (start, end.unwrap_or(chars.len()));
    if hi < lo {
        std::mem::swap(&mut lo, &mut hi);
    }
    let lo = lo.min(chars.len());
    let hi = hi.min(chars.len());
    Value::Str(chars[lo..hi].iter().collect())
}

/// `replace` with the legacy pattern heuristic:
/// - `/…/`-wrapped patterns strip the delimiters and compile as a regex;
/// - patterns starting with a regex metacharacter compile as a regex;
/// - anything else is a literal, where `global` picks replace-all vs first.
///
/// Regex replacement always acts on every match (an anchored regex matches
/// once by construction), and the replacement text is taken literally.
pub fn replace(
    value: &Value,
    pattern: &str,
    replacement: &str,
    global: bool,
) -> Result<Value, AttexError> {
    let subject = value.safe_to_string();

    let regex_source = if pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/') {
        Some(&pattern[1..pattern.len() - 1])
    } else if pattern.starts_with(REGEX_LEADERS) {
        Some(pattern)
    } else {
        None
    };

    let out = match regex_source {
        Some(src) => {
            let re = Regex::new(src)
                .map_err(|e| AttexError::op("replace", format!("invalid regex '{src}': {e}")))?;
            re.replace_all(&subject, NoExpand(replacement)).into_owned()
        }
        None if global => subject.replace(pattern, replacement),
        None => subject.replacen(pattern, replacement, 1),
    };
    Ok(Value::Str(out))
}
