use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ErrorAccumulator;
use crate::log;

/// Tag pairs in the order their names first appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    entries: Vec<(String, String)>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated name keeps its original position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TagTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Reads every line starting with `[` as a `Key Value` tag pair.
///
/// Brackets and quotes are dropped before splitting on the first space. Lines
/// without a value yield an empty value; lines without a name are skipped.
pub fn parse_tags(text: &str) -> TagTable {
    let mut warnings = ErrorAccumulator::default();
    parse_tags_with(text, &mut warnings)
}

pub(crate) fn parse_tags_with(text: &str, warnings: &mut ErrorAccumulator) -> TagTable {
    let mut table = TagTable::new();

    for (line_no, line) in text.lines().enumerate() {
        if !line.starts_with('[') {
            continue;
        }

        let pruned: String = line
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | '"'))
            .collect();

        let (key, value) = match pruned.split_once(' ') {
            Some((key, value)) => (key, value),
            None => {
                let msg = format!("Tag line {}: no value in '{}'", line_no + 1, line.trim_end());
                log::warn(&msg);
                warnings.push(&msg);
                (pruned.as_str(), "")
            }
        };

        if key.is_empty() {
            let msg = format!("Tag line {}: no name in '{}'", line_no + 1, line.trim_end());
            log::warn(&msg);
            warnings.push(&msg);
            continue;
        }

        table.insert(key, value);
    }

    table
}
