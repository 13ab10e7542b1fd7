//! Block attributes.
//!
//! Hosts hand over a block's attributes as a flat string map. The attributes
//! this crate understands are split out into typed fields by
//! [`BlockAttributes::split`]; everything else is carried through untouched and
//! merged into the produced node.

use indexmap::IndexMap;

/// Attribute naming the output file.
pub const TARGET: &str = "target";

/// Attribute naming the output format.
pub const FORMAT: &str = "format";

/// Attribute holding the accessibility text of an image.
pub const ALT: &str = "alt";

/// Attribute holding the block title.
pub const TITLE: &str = "title";

/// Names given to positional attributes, in order.
pub const POSITIONAL: [&str; 2] = [TARGET, FORMAT];

/// Ordered map of attribute names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names positional values using [`POSITIONAL`].
    ///
    /// Values beyond the known positional names are ignored. A named
    /// attribute that is already present is not overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use umlblock_core::attributes::Attributes;
    ///
    /// let attrs = Attributes::new().with_positional(["diagram.svg", "svg"]);
    /// assert_eq!(attrs.get("target"), Some("diagram.svg"));
    /// assert_eq!(attrs.get("format"), Some("svg"));
    /// ```
    pub fn with_positional<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (name, value) in POSITIONAL.iter().zip(values) {
            self.0
                .entry((*name).to_string())
                .or_insert_with(|| value.into());
        }
        self
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Sets an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes an attribute, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    /// Returns `true` if the attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Adds every attribute from `other`, overwriting existing values.
    pub fn merge(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Block attributes split into the recognized fields and a pass-through remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAttributes {
    target: Option<String>,
    format: Option<String>,
    rest: Attributes,
}

impl BlockAttributes {
    /// Splits `target` and `format` out of `attributes`.
    ///
    /// `alt` and `title` stay in the remainder; they are consulted when an
    /// image node is built and passed through otherwise.
    pub fn split(mut attributes: Attributes) -> Self {
        let target = attributes.remove(TARGET);
        let format = attributes.remove(FORMAT);
        Self {
            target,
            format,
            rest: attributes,
        }
    }

    /// Returns the explicit output file name, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the raw format identifier, if the block named one.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the pass-through attributes.
    pub fn rest(&self) -> &Attributes {
        &self.rest
    }

    /// Consumes the split and returns the pass-through attributes.
    pub fn into_rest(self) -> Attributes {
        self.rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_removes_recognized_attributes() {
        let attrs: Attributes = [
            ("target", "flow.svg"),
            ("format", "svg"),
            ("alt", "Flow"),
            ("role", "wide"),
        ]
        .into_iter()
        .collect();

        let split = BlockAttributes::split(attrs);
        assert_eq!(split.target(), Some("flow.svg"));
        assert_eq!(split.format(), Some("svg"));
        assert!(!split.rest().contains("target"));
        assert!(!split.rest().contains("format"));

        let rest: Vec<_> = split.rest().iter().collect();
        assert_eq!(rest, vec![("alt", "Flow"), ("role", "wide")]);
    }

    #[test]
    fn test_split_empty() {
        let split = BlockAttributes::split(Attributes::new());
        assert_eq!(split.target(), None);
        assert_eq!(split.format(), None);
        assert!(split.into_rest().is_empty());
    }

    #[test]
    fn test_positional_does_not_override_named() {
        let mut attrs = Attributes::new();
        attrs.insert("format", "txt");

        let attrs = attrs.with_positional(["out.png", "png", "ignored"]);
        assert_eq!(attrs.get("target"), Some("out.png"));
        assert_eq!(attrs.get("format"), Some("txt"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_positional_partial() {
        let attrs = Attributes::new().with_positional(["only-target.png"]);
        assert_eq!(attrs.get("target"), Some("only-target.png"));
        assert_eq!(attrs.get("format"), None);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut attrs: Attributes = [("alt", "old"), ("id", "d1")].into_iter().collect();
        attrs.merge([("alt", "new")].into_iter().collect());

        assert_eq!(attrs.get("alt"), Some("new"));
        assert_eq!(attrs.get("id"), Some("d1"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(attrs.remove("a"), Some("1".to_string()));

        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }
}
