// Form snapshot files - field values captured from a page, duplicates included
use crate::domain::form::{pick_candidate, FieldCandidate, FieldKey, FormState};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A TOML document listing every on-page copy of every field, in document
/// order:
///
/// ```toml
/// [[field]]
/// key = "coalName1"
/// value = "Indo"
/// visible = true
/// active_panel = true
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct FormSnapshot {
    #[serde(default, rename = "field")]
    pub fields: Vec<SnapshotField>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotField {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub active_panel: bool,
}

fn default_visible() -> bool {
    true
}

impl FormSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form snapshot {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid form snapshot {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Collapse the snapshot into a form holding one value per field.
    /// Unknown keys are skipped.
    pub fn into_form_state(self) -> FormState {
        let mut order: Vec<FieldKey> = Vec::new();
        let mut candidates: HashMap<FieldKey, Vec<FieldCandidate>> = HashMap::new();

        for field in self.fields {
            let key = match field.key.parse::<FieldKey>() {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping snapshot entry: {}", e);
                    continue;
                }
            };

            let copies = candidates.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            copies.push(FieldCandidate {
                value: field.value,
                visible: field.visible,
                in_active_panel: field.active_panel,
            });
        }

        let mut form = FormState::new();
        for key in order {
            let Some(copies) = candidates.get(&key) else {
                continue;
            };
            if let Some(chosen) = pick_candidate(copies) {
                if copies.len() > 1 {
                    tracing::debug!(
                        "Field {} has {} copies, using {:?}",
                        key,
                        copies.len(),
                        chosen.value
                    );
                }
                form.set(key, chosen.value.clone());
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"
[[field]]
key = "coalName1"
value = "stale copy"
visible = false

[[field]]
key = "coalName1"
value = "Indo"
active_panel = true

[[field]]
key = "gcvBox1"
value = "4500.00"

[[field]]
key = "flow.0"
value = "hidden"
visible = false

[[field]]
key = "flow.0"
value = "12"

[[field]]
key = "totalFlow"
value = "99"

[[field]]
key = "generation"
value = "210"
"#;

    #[test]
    fn test_duplicates_resolve_to_one_value() {
        let form = FormSnapshot::parse(SNAPSHOT).unwrap().into_form_state();

        assert_eq!(form.get(FieldKey::CoalName(1)), Some("Indo"));
        assert_eq!(form.get(FieldKey::Gcv(1)), Some("4500.00"));
        assert_eq!(form.get(FieldKey::Flow(0)), Some("12"));
        assert_eq!(form.get(FieldKey::Generation), Some("210"));
        assert_eq!(form.get(FieldKey::CoalName(2)), Some(""));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = FormSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.fields.len(), 7);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FormSnapshot::load(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_empty_snapshot_is_default_form() {
        let form = FormSnapshot::parse("").unwrap().into_form_state();
        assert_eq!(form, FormState::new());
    }
}
