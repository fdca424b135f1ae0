//! Property identifier normalization.
//!
//! Older SGF versions allowed long, mixed-case identifiers such as
//! `CoPyright` or `White`. Only the uppercase letters are significant, so
//! `CoPyright` is `CP` and `White` is `W`.

use std::borrow::Cow;

/// Identifier of the character-set property.
pub const CHARSET: &str = "CA";

/// Reduces an identifier to its uppercase letters.
///
/// Returns the input unchanged (borrowed) when it is already canonical. An
/// empty result means the identifier is invalid.
///
/// # Examples
///
/// ```rust
/// use sgf_format::normalize;
///
/// assert_eq!(normalize("SZ"), "SZ");
/// assert_eq!(normalize("CoPyright"), "CP");
/// assert_eq!(normalize("Comment"), "C");
/// assert_eq!(normalize("board"), "");
/// ```
#[must_use]
pub fn normalize(ident: &str) -> Cow<'_, str> {
    if is_canonical(ident) {
        Cow::Borrowed(ident)
    } else {
        Cow::Owned(ident.chars().filter(char::is_ascii_uppercase).collect())
    }
}

/// Returns `true` if `key` is a non-empty run of uppercase ASCII letters.
#[inline]
#[must_use]
pub fn is_canonical(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_uppercase())
}
