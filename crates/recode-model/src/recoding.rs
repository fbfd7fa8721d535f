//! The compiled two-level recoding map.
//!
//! ```text
//! RecodingMap
//! ├── "status" -> VariableRecode { "A" -> "Accepted", "R" -> "Rejected" }
//! └── "gender" -> VariableRecode { 1 -> "Man", 2 -> "Woman" }
//! ```
//!
//! Both levels preserve first-seen insertion order. A `RecodingMap` has no
//! mutating accessors; it is assembled through [`RecodingMapBuilder`] and
//! then shared read-only.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::value::{CellValue, CodeValue, float_to_key};

/// Old value -> new label for a single variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRecode {
    entries: IndexMap<CodeValue, CodeValue>,
}

impl VariableRecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous label when `old` was present.
    ///
    /// An existing key keeps its position; only the label changes.
    pub fn insert(&mut self, old: CodeValue, label: CodeValue) -> Option<CodeValue> {
        match self.entries.entry(old) {
            Entry::Occupied(mut entry) => Some(entry.insert(label)),
            Entry::Vacant(entry) => {
                entry.insert(label);
                None
            }
        }
    }

    /// Exact key lookup.
    pub fn get(&self, old: &CodeValue) -> Option<&CodeValue> {
        self.entries.get(old)
    }

    /// Lookup for a dataset cell.
    ///
    /// Exact matches win. The only other match is between an integer and
    /// its canonical text: a text cell `"2"` finds an `Int(2)` key and an
    /// integer cell `2` finds a `Text("2")` key, while `"02"`, `"+2"` and
    /// `"2.0"` match nothing but themselves. An integral float cell is
    /// treated as the integer. Nulls never match.
    pub fn lookup(&self, cell: &CellValue) -> Option<&CodeValue> {
        match cell {
            CellValue::Null => None,
            CellValue::Bool(value) => self.entries.get(&CodeValue::Bool(*value)),
            CellValue::Int(value) => self.lookup_int(*value),
            CellValue::Float(value) => float_to_key(*value).and_then(|key| self.lookup_int(key)),
            CellValue::Text(value) => {
                let key = CodeValue::Text(value.clone());
                if let Some(label) = self.entries.get(&key) {
                    return Some(label);
                }
                key.numeric_key()
                    .and_then(|int| self.entries.get(&CodeValue::Int(int)))
            }
        }
    }

    fn lookup_int(&self, value: i64) -> Option<&CodeValue> {
        self.entries
            .get(&CodeValue::Int(value))
            .or_else(|| self.entries.get(&CodeValue::Text(value.to_string())))
    }

    pub fn contains_key(&self, old: &CodeValue) -> bool {
        self.entries.contains_key(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CodeValue, &CodeValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CodeValue> {
        self.entries.keys()
    }

    pub fn labels(&self) -> impl Iterator<Item = &CodeValue> {
        self.entries.values()
    }

    /// Whether `cell` is one of this variable's new labels.
    ///
    /// Numbers compare by value, as in [`lookup`](Self::lookup).
    pub fn is_label(&self, cell: &CellValue) -> bool {
        let (value, numeric) = match cell {
            CellValue::Null => return false,
            CellValue::Float(value) => (None, float_to_key(*value)),
            other => match CodeValue::try_from(other.clone()) {
                Ok(value) => {
                    let numeric = value.numeric_key();
                    (Some(value), numeric)
                }
                Err(_) => return false,
            },
        };
        self.entries.values().any(|label| {
            value.as_ref() == Some(label) || (numeric.is_some() && label.numeric_key() == numeric)
        })
    }
}

impl FromIterator<(CodeValue, CodeValue)> for VariableRecode {
    fn from_iter<I: IntoIterator<Item = (CodeValue, CodeValue)>>(iter: I) -> Self {
        let mut recode = Self::new();
        for (old, label) in iter {
            recode.insert(old, label);
        }
        recode
    }
}

impl Serialize for VariableRecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (old, label) in &self.entries {
            map.serialize_entry(&old.to_string(), label)?;
        }
        map.end()
    }
}

/// Variable identifier -> [`VariableRecode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecodingMap {
    variables: IndexMap<String, VariableRecode>,
}

impl RecodingMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&VariableRecode> {
        self.variables.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.variables.contains_key(variable)
    }

    /// Variable identifiers in first-seen order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableRecode)> {
        self.variables
            .iter()
            .map(|(variable, recode)| (variable.as_str(), recode))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Total number of old value entries across all variables.
    pub fn entry_count(&self) -> usize {
        self.variables.values().map(VariableRecode::len).sum()
    }
}

impl FromIterator<(String, VariableRecode)> for RecodingMap {
    fn from_iter<I: IntoIterator<Item = (String, VariableRecode)>>(iter: I) -> Self {
        let mut builder = RecodingMapBuilder::new();
        for (variable, recode) in iter {
            let target = builder.variable(&variable);
            for (old, label) in recode.entries {
                target.insert(old, label);
            }
        }
        builder.build()
    }
}

/// Assembles a [`RecodingMap`] in first-seen order.
#[derive(Debug, Default)]
pub struct RecodingMapBuilder {
    variables: IndexMap<String, VariableRecode>,
}

impl RecodingMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access (creating on first sight) the recode for `variable`.
    pub fn variable(&mut self, variable: &str) -> &mut VariableRecode {
        self.variables.entry(variable.to_string()).or_default()
    }

    pub fn build(self) -> RecodingMap {
        RecodingMap {
            variables: self.variables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> VariableRecode {
        [("A", "Accepted"), ("R", "Rejected"), ("W", "Waitlisted")]
            .into_iter()
            .map(|(old, label)| (CodeValue::from(old), CodeValue::from(label)))
            .collect()
    }

    #[test]
    fn insert_keeps_first_position() {
        let mut recode = VariableRecode::new();
        assert!(recode.insert("M".into(), "Man".into()).is_none());
        recode.insert("F".into(), "Woman".into());
        let previous = recode.insert("M".into(), "Male".into());
        assert_eq!(previous, Some(CodeValue::text("Man")));
        let keys: Vec<String> = recode.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["M", "F"]);
        assert_eq!(recode.get(&"M".into()), Some(&CodeValue::text("Male")));
    }

    #[test]
    fn lookup_ignores_nulls_and_unknowns() {
        let recode = status();
        assert_eq!(
            recode.lookup(&CellValue::Text("W".to_string())),
            Some(&CodeValue::text("Waitlisted"))
        );
        assert_eq!(recode.lookup(&CellValue::Text("X".to_string())), None);
        assert_eq!(recode.lookup(&CellValue::Null), None);
    }

    #[test]
    fn lookup_bridges_numeric_text() {
        let mut recode = VariableRecode::new();
        recode.insert(CodeValue::Int(1), "Man".into());
        recode.insert(CodeValue::text("2"), "Woman".into());
        assert_eq!(
            recode.lookup(&CellValue::Text("1".to_string())),
            Some(&CodeValue::text("Man"))
        );
        assert_eq!(
            recode.lookup(&CellValue::Int(2)),
            Some(&CodeValue::text("Woman"))
        );
        assert_eq!(
            recode.lookup(&CellValue::Float(1.0)),
            Some(&CodeValue::text("Man"))
        );
        assert_eq!(recode.lookup(&CellValue::Float(1.5)), None);
    }

    #[test]
    fn lookup_does_not_normalize_text() {
        let mut recode = VariableRecode::new();
        recode.insert(CodeValue::text("1"), "one".into());
        recode.insert(CodeValue::text("02134"), "Allston".into());
        for cell in ["01", "1.0", "+1", " 1", "2134"] {
            assert_eq!(recode.lookup(&CellValue::Text(cell.to_string())), None, "{cell}");
        }
        assert_eq!(recode.lookup(&CellValue::Int(2134)), None);
        assert_eq!(
            recode.lookup(&CellValue::Text("02134".to_string())),
            Some(&CodeValue::text("Allston"))
        );
        assert_eq!(
            recode.lookup(&CellValue::Int(1)),
            Some(&CodeValue::text("one"))
        );
    }

    #[test]
    fn builder_preserves_first_seen_variable_order() {
        let mut builder = RecodingMapBuilder::new();
        builder.variable("b").insert("1".into(), "one".into());
        builder.variable("a").insert("1".into(), "uno".into());
        builder.variable("b").insert("2".into(), "two".into());
        let map = builder.build();
        assert_eq!(map.variables().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.entry_count(), 3);
        assert_eq!(map.get("b").map(VariableRecode::len), Some(2));
    }

    #[test]
    fn is_label_matches_new_labels_only() {
        let recode = status();
        assert!(recode.is_label(&CellValue::Text("Accepted".to_string())));
        assert!(!recode.is_label(&CellValue::Text("A".to_string())));
        assert!(!recode.is_label(&CellValue::Null));

        let mut scores = VariableRecode::new();
        scores.insert(CodeValue::text("low"), CodeValue::Int(10));
        assert!(scores.is_label(&CellValue::Text("10".to_string())));
        assert!(scores.is_label(&CellValue::Float(10.0)));
    }
}
