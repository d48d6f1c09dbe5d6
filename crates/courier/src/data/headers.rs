use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Ordered header list with case-insensitive replacement.
///
/// Inserting a name that is already present replaces its value in place,
/// so the position of the first occurrence is kept.
///
/// ```
/// use courier::data::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "application/json");
/// headers.insert("Accept", "*/*");
/// headers.insert("content-type", "text/plain");
///
/// assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
/// assert_eq!(headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Insert every entry of `other`, letting it win on conflicts.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    #[must_use]
    pub fn merged(mut self, other: &Headers) -> Self {
        self.merge(other);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Headers, A::Error> {
                let mut headers = Headers::new();
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    headers.insert(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_and_appends() {
        let mut base: Headers = [("Content-Type", "application/json"), ("Accept", "*/*")]
            .into_iter()
            .collect();
        let overrides: Headers = [("content-type", "text/csv"), ("X-Id", "7")].into_iter().collect();
        base.merge(&overrides);

        let entries: Vec<_> = base.iter().collect();
        assert_eq!(
            entries,
            vec![("Content-Type", "text/csv"), ("Accept", "*/*"), ("X-Id", "7")]
        );
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut headers: Headers = [("Authorization", "Bearer t")].into_iter().collect();
        assert_eq!(headers.remove("authorization").as_deref(), Some("Bearer t"));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("authorization"), None);
    }

    #[test]
    fn deserializes_from_json_map() {
        let headers: Headers =
            serde_json::from_str(r#"{ "Accept": "application/json", "X-Trace": "1" }"#).unwrap();
        assert_eq!(headers.get("accept"), Some("application/json"));
        assert_eq!(headers.get("x-trace"), Some("1"));
    }
}
