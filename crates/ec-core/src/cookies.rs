//! Cookie jar accumulated from `Set-Cookie` directives.
//!
//! Only `name=value` pairs are kept. Attributes (`Path`, `Expires`, `HttpOnly`, ...) are
//! dropped; the upstream session cookies are never scoped or expired client side.

/// Insertion-ordered `name -> value` mapping.
///
/// A directive whose name is already present overwrites the value in place, so the
/// `Cookie` header keeps the order cookies were first seen in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cookies held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the jar is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Insert or overwrite one cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Merge one `Set-Cookie` directive. Returns `false` if it carried no usable pair.
    pub fn merge_directive(&mut self, directive: &str) -> bool {
        match parse_set_cookie(directive) {
            Some((name, value)) => {
                self.insert(name, value);
                true
            }
            None => false,
        }
    }

    /// Merge a sequence of `Set-Cookie` directives. Returns how many were applied.
    pub fn merge_directives<I, S>(&mut self, directives: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        directives
            .into_iter()
            .filter(|d| self.merge_directive(d.as_ref()))
            .count()
    }

    /// Overlay every cookie of `other` onto this jar.
    pub fn merge(&mut self, other: &CookieJar) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// `Cookie` request header value, or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Extract the `name=value` pair from a `Set-Cookie` directive.
///
/// The value keeps any further `=` characters. Directives without a name are rejected.
pub fn parse_set_cookie(directive: &str) -> Option<(&str, &str)> {
    let pair = directive.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}
