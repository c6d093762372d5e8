use serde::ser::{Serialize, SerializeMap, Serializer};

/// Validated answers keyed by question key, kept in the order they were recorded.
/// A key is recorded at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAnswers {
    entries: Vec<(String, String)>,
}

impl ProfileAnswers {
    /// Records `value` under `key`. Returns `false` (and records nothing) if the key
    /// already holds an answer.
    pub fn record(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.contains(key) {
            return false;
        }
        self.entries.push((key.to_string(), value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Serialized as a JSON object that preserves recording order.
impl Serialize for ProfileAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
