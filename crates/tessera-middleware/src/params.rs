//! Raw request parameters and the bag of validated values.
//!
//! [`PathParams`] and [`QueryParams`] hold the strings the HTTP layer
//! extracted; [`ParamBag`] holds what parameter units produced from them.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;

/// Maximum number of path parameters stored inline.
const INLINE_PARAMS: usize = 4;

/// Raw path parameters captured by the route template.
///
/// # Example
///
/// ```rust
/// use tessera_middleware::PathParams;
///
/// let mut params = PathParams::new();
/// params.push("userId", "123");
///
/// assert_eq!(params.get("userId"), Some("123"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl PathParams {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a captured parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the raw value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Raw query string pairs, possibly with repeated keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is not valid URL encoding.
    pub fn parse(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(Self { pairs })
    }

    /// Appends a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the first value of `name`; later duplicates are ignored.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of `name` in query order.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the query has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Validated parameter values, keyed by parameter name.
#[derive(Default)]
pub struct ParamBag {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ParamBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous value of that name.
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    /// Returns the value of `name` if it exists and has type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|value| value.downcast_ref())
    }

    /// Removes and returns the value of `name` if it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Send + Sync + 'static>(&mut self, name: &str) -> Option<T> {
        if !self.values.get(name).is_some_and(|value| value.is::<T>()) {
            return None;
        }
        self.values
            .remove(name)
            .and_then(|value| value.downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Returns true if a value of any type is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ParamBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ParamBag").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params() {
        let mut params = PathParams::new();
        params.push("userId", "42");
        params.push("postId", "7");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("postId"), Some("7"));
        let names: Vec<_> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["userId", "postId"]);
    }

    #[test]
    fn test_query_first_occurrence_wins() {
        let query = QueryParams::parse("limit=5&limit=10&q=a%20b").unwrap();
        assert_eq!(query.first("limit"), Some("5"));
        assert_eq!(query.all("limit").collect::<Vec<_>>(), vec!["5", "10"]);
        assert_eq!(query.first("q"), Some("a b"));
        assert_eq!(query.first("missing"), None);
    }

    #[test]
    fn test_query_empty_value() {
        let query = QueryParams::parse("sort=").unwrap();
        assert_eq!(query.first("sort"), Some(""));
        assert!(QueryParams::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_param_bag_typed_access() {
        let mut bag = ParamBag::new();
        bag.insert("limit", 10_i64);
        bag.insert("ids", vec!["a".to_string()]);

        assert_eq!(bag.get::<i64>("limit"), Some(&10));
        assert_eq!(bag.get::<String>("limit"), None);
        assert!(bag.contains("ids"));

        assert_eq!(bag.take::<String>("ids"), None);
        assert!(bag.contains("ids"));
        assert_eq!(bag.take::<Vec<String>>("ids"), Some(vec!["a".to_string()]));
        assert!(!bag.contains("ids"));
        assert_eq!(format!("{bag:?}"), r#"ParamBag { names: ["limit"] }"#);
    }
}
