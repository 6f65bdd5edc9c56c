use serde::{Deserialize, Serialize};

/// A save archive discovered in the saves folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEntry {
    /// Display name, taken from the save's subdirectory
    pub name: String,

    /// Absolute path to the `.lsv` archive
    pub path: String,

    /// Last-modified timestamp, preformatted for display
    pub modified: String,
}

/// Read-only descriptive fields of the most recently extracted save
///
/// The backend hands over the contents of `SaveInfo.json` as arbitrary JSON;
/// the session treats the document as opaque and only offers keyed access for
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveMetadata(serde_json::Value);

impl SaveMetadata {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// The underlying JSON document
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Pretty-printed JSON for display
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Proof that a save archive has been unpacked into the backend's working area
///
/// Issued only by a successful extraction and required by every operation that
/// reads or mutates the unpacked data, so those operations cannot be called
/// before an extraction exists. Dropped when the session resets or a different
/// save is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSave {
    source_path: String,
}

impl ExtractedSave {
    pub(crate) fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
        }
    }

    /// Path of the archive this extraction came from
    pub fn source_path(&self) -> &str {
        &self.source_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_exposes_top_level_fields() {
        let meta = SaveMetadata::new(json!({"SaveName": "slot1", "Level": "WLD_Main_A"}));
        assert_eq!(meta.get("SaveName"), Some(&json!("slot1")));
        assert_eq!(meta.get("Missing"), None);
    }

    #[test]
    fn save_entry_round_trips_through_json() {
        let entry = SaveEntry {
            name: "slot1".into(),
            path: "C:\\saves\\story\\slot1\\slot1.lsv".into(),
            modified: "2026-08-01 10:30:00".into(),
        };
        let wire = serde_json::to_string(&entry).unwrap();
        assert_eq!(serde_json::from_str::<SaveEntry>(&wire).unwrap(), entry);
    }
}
