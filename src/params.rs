use std::fmt;

use smallvec::SmallVec;

/// The capability a parameter sink has to expose to [`search`](crate::Trie::search).
///
/// The trie calls [`set`](ParamsSetter::set) once per parameter of the matched
/// pattern, in the order the parameters appear in it. Implementations decide
/// how to store the pairs; [`Params`] is the ready-made one.
pub trait ParamsSetter {
    /// Records one `name = value` binding.
    fn set(&mut self, name: &str, value: &str);
}

// most routes carry only a handful of parameters, so keep them inline
const SMALL: usize = 4;

/// A list of captured path parameters.
///
/// ```rust
/// use pathtrie::{with_handler, Params, Trie};
///
/// let mut trie = Trie::new();
/// trie.insert("/users/:id", [with_handler(())]);
///
/// let mut params = Params::new();
/// trie.search("/users/978", &mut params).unwrap();
/// assert_eq!(params.get("id"), Some("978"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: SmallVec<[(Box<str>, Box<str>); SMALL]>,
}

impl Params {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of the first parameter recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| &**value)
    }

    /// Iterates over the recorded `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (&**key, &**value))
    }

    /// The number of recorded parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParamsSetter for Params {
    fn set(&mut self, name: &str, value: &str) {
        self.entries.push((name.into(), value.into()));
    }
}

impl ParamsSetter for Vec<(String, String)> {
    fn set(&mut self, name: &str, value: &str) {
        self.push((name.to_owned(), value.to_owned()));
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn capture_order_is_preserved() {
        let mut params = Params::new();
        params.set("user", "gordon");
        params.set("repo", "pathtrie");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("user", "gordon"), ("repo", "pathtrie")]);
        assert_eq!(params.get("user"), Some("gordon"));
        assert_eq!(params.get("repo"), Some("pathtrie"));
    }

    #[test]
    fn first_binding_wins_on_lookup() {
        let mut params = Params::new();
        params.set("name", "first");
        params.set("name", "second");

        assert_eq!(params.get("name"), Some("first"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn vec_sink() {
        let mut sink: Vec<(String, String)> = Vec::new();
        sink.set("id", "42");
        assert_eq!(sink, [("id".to_owned(), "42".to_owned())]);
    }
}
