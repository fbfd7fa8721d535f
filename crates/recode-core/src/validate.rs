//! Codebook diagnostics that do not change compilation.

use std::collections::{HashMap, HashSet};

use recode_model::{CellValue, CodeValue, CodebookRow, RecodingMap};

/// Two rows of one variable giving different labels to the same old value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub variable: String,
    pub old_value: CodeValue,
    pub first_label: CodeValue,
    pub second_label: CodeValue,
    /// 1-based positions of the two rows in the input.
    pub first_row: usize,
    pub second_row: usize,
}

/// List every conflicting duplicate, in input order.
///
/// Each conflicting row is reported against the row it would overwrite.
/// Identical repeats are not reported.
pub fn find_collisions(rows: &[CodebookRow]) -> Vec<Collision> {
    let mut seen: HashMap<(&str, &CodeValue), (usize, &CodeValue)> = HashMap::new();
    let mut collisions = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let position = idx + 1;
        let key = (row.variable.as_str(), &row.old_value);
        match seen.insert(key, (position, &row.new_label)) {
            Some((first_row, first_label)) if *first_label != row.new_label => {
                collisions.push(Collision {
                    variable: row.variable.clone(),
                    old_value: row.old_value.clone(),
                    first_label: first_label.clone(),
                    second_label: row.new_label.clone(),
                    first_row,
                    second_row: position,
                });
            }
            _ => {}
        }
    }
    collisions
}

/// A new label that is also an old value of the same variable.
///
/// Applying the map twice re-maps such labels, so recoding is not
/// idempotent for these variables. Labels are matched the way dataset
/// cells are, so a text label `"2"` chains into an `Int(2)` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedLabel {
    pub variable: String,
    pub label: CodeValue,
    /// What the label turns into on a second pass.
    pub remapped_to: CodeValue,
}

pub fn chained_labels(map: &RecodingMap) -> Vec<ChainedLabel> {
    let mut chained = Vec::new();
    for (variable, recode) in map.iter() {
        let mut reported = HashSet::new();
        for label in recode.labels() {
            if !reported.insert(label) {
                continue;
            }
            let Some(next) = recode.lookup(&CellValue::from(label.clone())) else {
                continue;
            };
            if next.to_string() == label.to_string() {
                continue;
            }
            chained.push(ChainedLabel {
                variable: variable.to_string(),
                label: label.clone(),
                remapped_to: next.clone(),
            });
        }
    }
    chained
}
