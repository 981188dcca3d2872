use indexmap::IndexMap;
use log::debug;

use super::factor::EmissionFactorRecord;

/// Lowercases and trims a keyword or description before any comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Read-only lookup from normalized keyword to its emission factor record.
///
/// Keys are kept in insertion order: records in load order, each category
/// before its aliases. The resolver relies on that order for tie-breaks.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    records: Vec<EmissionFactorRecord>,
    keys: IndexMap<String, usize>,
}

impl KeywordIndex {
    /// Later records overwrite earlier ones that normalize to the same key.
    pub fn build(records: impl IntoIterator<Item = EmissionFactorRecord>) -> KeywordIndex {
        let mut index = KeywordIndex::default();

        for record in records {
            let position = index.records.len();
            let keywords = std::iter::once(record.category()).chain(record.aliases().iter());

            for keyword in keywords {
                let key = normalize(keyword);
                if key.is_empty() {
                    continue;
                }

                if let Some(previous) = index.keys.insert(key.clone(), position) {
                    if previous != position {
                        debug!(
                            "keyword {:?} remapped from {:?} to {:?}",
                            key,
                            index.records[previous].category(),
                            record.category()
                        );
                    }
                }
            }

            index.records.push(record);
        }

        index
    }

    pub fn get(&self, key: &str) -> Option<(&str, &EmissionFactorRecord)> {
        self.keys
            .get_key_value(key)
            .map(|(key, &position)| (key.as_str(), &self.records[position]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionFactorRecord)> {
        self.keys
            .iter()
            .map(|(key, &position)| (key.as_str(), &self.records[position]))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
