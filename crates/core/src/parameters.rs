//! Request parameters.
//!
//! An insertion-ordered multimap of query parameters. Keys are case-sensitive and values are
//! opaque strings; nothing here decodes or validates them.

use crate::constants::IDENTIFIER_KEY;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, Vec<String>)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// `identifier=<id>`, the shape used by read-by-id lookups.
    pub fn for_identity(id: impl Into<String>) -> Self {
        let mut parameters = Self::new();
        parameters.add(IDENTIFIER_KEY, id);
        parameters
    }

    /// Appends `value` under `key`, keeping the key's first position.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Replaces every value under `key`.
    pub fn put(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First `identifier` value.
    pub fn identifier_of(&self) -> Option<&str> {
        self.first(IDENTIFIER_KEY)
    }

    /// `?k1=v1&k1=v2&k2=v3`, keys sorted. Empty parameters render as an empty string.
    pub fn to_query_string(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut sorted: Vec<&(String, Vec<String>)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let pairs = sorted
            .into_iter()
            .flat_map(|(k, values)| values.iter().map(move |v| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{pairs}")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (k, v) in iter {
            parameters.add(k, v);
        }
        parameters
    }
}
