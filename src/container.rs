//! Ordered keyed collections.
//!
//! A [`Container`] keeps elements in insertion order and indexes them by
//! string key. Positional access accepts negative indices counting from
//! the end, so `at(-1)` is the last element.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::LookupError;

/// Optional row-formatting capability used when printing a container.
///
/// Every hook defaults to `None`, meaning "nothing to add"; elements
/// override only the parts they have something to say about.
pub trait Describable {
    /// Leading label of the row.
    fn short_repr(&self) -> Option<String> {
        None
    }

    /// Middle column (switches, extension markers, values).
    fn middle_repr(&self) -> Option<String> {
        None
    }

    /// Trailing column, usually a truncated comment.
    fn end_repr(&self) -> Option<String> {
        None
    }
}

/// Key used to look an element up either by name or by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKey {
    /// Look up by key.
    Key(String),
    /// Look up by position; negative counts from the end.
    Position(i64),
}

impl From<&str> for ContainerKey {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for ContainerKey {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for ContainerKey {
    fn from(index: i64) -> Self {
        Self::Position(index)
    }
}

impl From<i32> for ContainerKey {
    fn from(index: i32) -> Self {
        Self::Position(i64::from(index))
    }
}

/// Ordered, keyed collection of shared elements.
#[derive(Debug)]
pub struct Container<T> {
    keys: Vec<String>,
    items: Vec<Arc<T>>,
    index: HashMap<String, usize>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Container<T> {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `key`. An existing key is replaced in place.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Arc<T>>) {
        let key = key.into();
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            self.items[pos] = value;
            return;
        }
        self.index.insert(key.clone(), self.items.len());
        self.keys.push(key);
        self.items.push(value);
    }

    /// Looks an element up by key.
    pub fn get(&self, key: &str) -> Result<&Arc<T>, LookupError> {
        self.index
            .get(key)
            .map(|&pos| &self.items[pos])
            .ok_or_else(|| LookupError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Looks an element up by position; negative positions count from the end.
    pub fn at(&self, index: i64) -> Result<&Arc<T>, LookupError> {
        let len = self.items.len();
        let out_of_range = || LookupError::IndexOutOfRange { index, len };
        let pos = if index < 0 {
            let back = usize::try_from(index.unsigned_abs()).map_err(|_| out_of_range())?;
            len.checked_sub(back).ok_or_else(out_of_range)?
        } else {
            usize::try_from(index).map_err(|_| out_of_range())?
        };
        self.items.get(pos).ok_or_else(out_of_range)
    }

    /// Looks an element up by either key or position.
    pub fn lookup(&self, key: impl Into<ContainerKey>) -> Result<&Arc<T>, LookupError> {
        match key.into() {
            ContainerKey::Key(k) => self.get(&k),
            ContainerKey::Position(i) => self.at(i),
        }
    }

    /// Whether an element is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the container holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Arc<T>> {
        self.items.first()
    }

    /// The last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Arc<T>> {
        self.items.last()
    }

    /// Iterates over elements in container order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<T>> {
        self.items.iter()
    }

    /// Iterates over keys in container order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Iterates over `(key, element)` pairs in container order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.keys.iter().map(String::as_str).zip(self.items.iter())
    }

    /// Stably reorders the elements by `key`, keeping discovery order on ties.
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&T) -> K) {
        let mut pairs: Vec<(String, Arc<T>)> = self
            .keys
            .drain(..)
            .zip(self.items.drain(..))
            .collect();
        pairs.sort_by_key(|(_, item)| key(item));

        self.index.clear();
        for (pos, (k, item)) in pairs.into_iter().enumerate() {
            self.index.insert(k.clone(), pos);
            self.keys.push(k);
            self.items.push(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Describable> fmt::Display for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, (key, item)) in self.entries().enumerate() {
            let short = item.short_repr().unwrap_or_else(|| key.to_string());
            let mut row = format!("{pos}: {short}");
            for part in [item.middle_repr(), item.end_repr()].into_iter().flatten() {
                if !part.is_empty() {
                    row.push_str(" | ");
                    row.push_str(&part);
                }
            }
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Truncates a comment for the trailing column of a container row.
pub(crate) fn truncate_comment(comment: &str) -> String {
    const LIMIT: usize = 50;
    if comment.chars().count() < LIMIT {
        comment.to_string()
    } else {
        let head: String = comment.chars().take(LIMIT).collect();
        format!("{head} ...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        name: &'static str,
        order: i64,
    }

    impl Describable for Row {
        fn short_repr(&self) -> Option<String> {
            Some(self.name.to_string())
        }

        fn middle_repr(&self) -> Option<String> {
            Some(format!("order {}", self.order))
        }
    }

    fn rows() -> Container<Row> {
        let mut c: Container<Row> = Container::new();
        c.add("a", Row { name: "alpha", order: 3 });
        c.add("b", Row { name: "beta", order: 1 });
        c.add("c", Row { name: "gamma", order: 3 });
        c
    }

    #[test]
    fn lookup_by_key_and_position() {
        let c = rows();
        assert_eq!(c.get("b").unwrap().name, "beta");
        assert_eq!(c.at(0).unwrap().name, "alpha");
        assert_eq!(c.at(-1).unwrap().name, "gamma");
        assert_eq!(c.lookup("c").unwrap().name, "gamma");
        assert_eq!(c.lookup(-3).unwrap().name, "alpha");
    }

    #[test]
    fn lookup_failures() {
        let c = rows();
        assert_eq!(
            c.get("zz").unwrap_err(),
            LookupError::KeyNotFound { key: "zz".to_string() }
        );
        assert_eq!(
            c.at(3).unwrap_err(),
            LookupError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(c.at(-4).is_err());
        assert!(c.at(i64::MIN).is_err());
    }

    #[test]
    fn sort_is_stable_and_reindexes() {
        let mut c = rows();
        c.sort_by_key(|r| r.order);
        let names: Vec<_> = c.iter().map(|r| r.name).collect();
        assert_eq!(names, ["beta", "alpha", "gamma"]);
        assert_eq!(c.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(c.get("a").unwrap().name, "alpha");
        assert_eq!(c.at(0).unwrap().name, "beta");
    }

    #[test]
    fn re_adding_key_replaces_in_place() {
        let mut c = rows();
        c.add("a", Row { name: "alpha2", order: 0 });
        assert_eq!(c.len(), 3);
        assert_eq!(c.at(0).unwrap().name, "alpha2");
    }

    #[test]
    fn display_uses_describable_hooks() {
        let out = rows().to_string();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "0: alpha | order 3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn truncates_long_comments() {
        assert_eq!(truncate_comment("short"), "short");
        let long = "x".repeat(60);
        let cut = truncate_comment(&long);
        assert!(cut.ends_with(" ..."));
        assert_eq!(cut.len(), 54);
    }
}
