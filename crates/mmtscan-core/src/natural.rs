//! # Natural Sort Keys
//!
//! Orders strings the way people read them: embedded digit runs compare by
//! numeric value, everything else compares case-insensitively. `model2`
//! sorts before `model10`, and `Beeler` sorts next to `beeler`.
//!
//! A string is split on runs of ASCII digits, keeping the digit runs and the
//! text between them as alternating segments. The first and last segments are
//! always text, possibly empty, so any two keys are type-homogeneous at every
//! position.
//!
//! Digit runs are kept as normalized digit strings rather than parsed into a
//! fixed-width integer, so arbitrarily long runs never overflow.

use std::cmp::Ordering;

/// One segment of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A run of decimal digits, stored without leading zeros (`"0"` for zero).
    Number(String),
    /// A non-digit run, lowercased. May be empty.
    Text(String),
}

impl Token {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Token::Number("0".to_string())
        } else {
            Token::Number(trimmed.to_string())
        }
    }

    fn text(segment: &str) -> Self {
        Token::Text(segment.to_lowercase())
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Normalized digit strings: fewer digits means a smaller value.
            (Token::Number(a), Token::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            (Token::Number(_), Token::Text(_)) => Ordering::Less,
            (Token::Text(_), Token::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key produced by [`natural_sort_key`].
///
/// Keys compare element-wise; when one key is a prefix of the other the
/// shorter key sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NaturalKey(Vec<Token>);

impl NaturalKey {
    /// The tokens making up this key, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

/// Build the natural sort key for `s`.
///
/// ```
/// use mmtscan_core::{natural_sort_key, Token};
///
/// let key = natural_sort_key("Item10b");
/// assert_eq!(
///     key.tokens(),
///     &[
///         Token::Text("item".into()),
///         Token::Number("10".into()),
///         Token::Text("b".into()),
///     ]
/// );
/// ```
pub fn natural_sort_key(s: &str) -> NaturalKey {
    let mut tokens = Vec::new();
    let mut rest = s;

    loop {
        let text_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        tokens.push(Token::text(&rest[..text_end]));
        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        tokens.push(Token::number(&rest[..digits_end]));
        rest = &rest[digits_end..];
    }

    NaturalKey(tokens)
}

/// Sort a slice of strings in natural order.
///
/// Strings with equal keys (`"A1"` and `"a01"`) fall back to plain byte
/// order so the result does not depend on the input order.
pub fn sort_naturally<S: AsRef<str>>(items: &mut [S]) {
    sort_naturally_by(items, |s| s.as_ref());
}

/// Sort `items` by the natural order of the name `name` extracts from each.
///
/// Ties break on the raw name, as in [`sort_naturally`].
///
/// ```
/// use mmtscan_core::sort_naturally_by;
///
/// let mut entries = vec![("run10", 1), ("run9", 2)];
/// sort_naturally_by(&mut entries, |(name, _)| *name);
/// assert_eq!(entries, vec![("run9", 2), ("run10", 1)]);
/// ```
pub fn sort_naturally_by<T, F>(items: &mut [T], mut name: F)
where
    F: FnMut(&T) -> &str,
{
    items.sort_by_cached_key(|item| {
        let text = name(item);
        (natural_sort_key(text), text.to_string())
    });
}
