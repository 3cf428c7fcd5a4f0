// ============================================================
// Layer 3 - Class Labels
// ============================================================
// The ordered list of class names a model was trained on.
// Position i in the list is the label of output unit i, so the
// order is part of the model artifact and is persisted next to
// the weights as a JSON array.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Non-empty, duplicate-free, ordered class labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassLabels {
    labels: Vec<String>,
}

impl ClassLabels {
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            bail!("A model needs at least one class label");
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                bail!("Duplicate class label '{label}'");
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for ClassLabels {
    type Error = anyhow::Error;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        Self::new(labels)
    }
}

impl From<ClassLabels> for Vec<String> {
    fn from(labels: ClassLabels) -> Self {
        labels.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Result<ClassLabels> {
        ClassLabels::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(labels(&[]).is_err());
        assert!(labels(&["Native", "Native"]).is_err());
    }

    #[test]
    fn test_lookup_by_index_and_name() {
        let l = labels(&["Invasive Species", "Native"]).unwrap();
        assert_eq!(l.len(), 2);
        assert_eq!(l.get(1), Some("Native"));
        assert_eq!(l.get(2), None);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec!["Invasive Species", "Native"]);
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let l = labels(&["a", "b"]).unwrap();
        let json = serde_json::to_string(&l).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: ClassLabels = serde_json::from_str(&json).unwrap();
        assert_eq!(back, l);
        assert!(serde_json::from_str::<ClassLabels>("[]").is_err());
    }
}
