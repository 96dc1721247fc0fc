//! Threshold maps - tables resolved by "nearest key at or below" lookup.
//!
//! Both escalation stages and tone levels are stored this way: a key is the
//! minimum input at which its value applies, and keys need not be contiguous.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A threshold key (minimum escalation score or minimum tone level).
pub type Threshold = u64;

/// A mapping from non-negative thresholds to values.
///
/// Keys are kept ordered, so the best match for an input is the last entry
/// in the range `..=input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdMap<T> {
    entries: BTreeMap<Threshold, T>,
}

impl<T> ThresholdMap<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry, builder style.
    pub fn with(mut self, threshold: Threshold, value: T) -> Self {
        self.entries.insert(threshold, value);
        self
    }

    /// Insert an entry, returning the value previously stored at `threshold`.
    pub fn insert(&mut self, threshold: Threshold, value: T) -> Option<T> {
        self.entries.insert(threshold, value)
    }

    /// Value at the greatest key `<= value`.
    ///
    /// Returns `None` when the map is empty or every key exceeds `value`;
    /// callers decide the fallback.
    pub fn resolve(&self, value: Threshold) -> Option<&T> {
        self.resolve_entry(value).map(|(_, v)| v)
    }

    /// Like [`resolve`](Self::resolve), but also reports the matching key.
    pub fn resolve_entry(&self, value: Threshold) -> Option<(Threshold, &T)> {
        self.entries
            .range(..=value)
            .next_back()
            .map(|(key, v)| (*key, v))
    }

    /// Smallest key in the map.
    pub fn min_threshold(&self) -> Option<Threshold> {
        self.entries.keys().next().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (Threshold, &T)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl<T> Default for ThresholdMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Threshold, T)> for ThresholdMap<T> {
    fn from_iter<I: IntoIterator<Item = (Threshold, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// Content files key their tables with strings ("0", "50", ...), which is the
// only key type both JSON objects and TOML tables can carry.
impl<T: Serialize> Serialize for ThresholdMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ThresholdMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, T>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| {
                key.trim()
                    .parse::<Threshold>()
                    .map(|threshold| (threshold, value))
                    .map_err(|_| D::Error::custom(format!("invalid threshold key '{key}'")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages() -> ThresholdMap<&'static str> {
        ThresholdMap::new()
            .with(0, "dormant")
            .with(50, "stirring")
            .with(100, "rampant")
    }

    #[test]
    fn test_resolve_exact_and_between_keys() {
        let map = stages();
        assert_eq!(map.resolve(0), Some(&"dormant"));
        assert_eq!(map.resolve(49), Some(&"dormant"));
        assert_eq!(map.resolve(50), Some(&"stirring"));
        assert_eq!(map.resolve(99), Some(&"stirring"));
        assert_eq!(map.resolve(100), Some(&"rampant"));
        assert_eq!(map.resolve(10_000), Some(&"rampant"));
    }

    #[test]
    fn test_resolve_below_minimum_is_none() {
        let map = ThresholdMap::new().with(10, "late");
        assert_eq!(map.resolve(9), None);
        assert_eq!(map.resolve(10), Some(&"late"));
    }

    #[test]
    fn test_resolve_empty_map() {
        let map: ThresholdMap<String> = ThresholdMap::new();
        assert!(map.resolve(0).is_none());
        assert!(map.resolve(Threshold::MAX).is_none());
    }

    #[test]
    fn test_resolve_entry_reports_key() {
        let map = stages();
        assert_eq!(map.resolve_entry(75), Some((50, &"stirring")));
        assert_eq!(map.min_threshold(), Some(0));
    }

    #[test]
    fn test_deserialize_string_keys() {
        let map: ThresholdMap<String> =
            serde_json::from_str(r#"{"100": "c", "0": "a", "50": "b"}"#).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.resolve(60).map(String::as_str), Some("b"));
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 50, 100]);
    }

    #[test]
    fn test_deserialize_rejects_bad_key() {
        let result: Result<ThresholdMap<String>, _> = serde_json::from_str(r#"{"high": "x"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid threshold key 'high'"), "{err}");

        let negative: Result<ThresholdMap<String>, _> = serde_json::from_str(r#"{"-1": "x"}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_serialize_uses_string_keys() {
        let json = serde_json::to_value(stages()).unwrap();
        assert_eq!(json["50"], "stirring");
    }
}
