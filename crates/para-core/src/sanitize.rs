//! Stripping terminal escape sequences from user-supplied arguments.
//!
//! Arguments can come from interactive prompts (pasted text). They must not
//! carry control sequences into later console rendering.

use std::path::PathBuf;

/// Types whose string content can be stripped of terminal escapes.
pub trait Sanitize {
    /// Return the value with every terminal escape sequence removed.
    #[must_use]
    fn sanitize(self) -> Self;
}

/// Remove ANSI escape sequences and stray control characters.
///
/// Newlines and tabs are kept.
pub fn strip_escapes(text: &str) -> String {
    console::strip_ansi_codes(text)
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

impl Sanitize for String {
    fn sanitize(self) -> Self {
        strip_escapes(&self)
    }
}

impl Sanitize for PathBuf {
    fn sanitize(self) -> Self {
        match self.to_str() {
            Some(text) => PathBuf::from(strip_escapes(text)),
            None => self,
        }
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(self) -> Self {
        self.map(Sanitize::sanitize)
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(self) -> Self {
        self.into_iter().map(Sanitize::sanitize).collect()
    }
}
