//! Inverse helpers: back to long format, and label -> old value.

use recode_model::{CodebookRow, RecodeError, RecodingMap, Result, VariableRecode};

/// Flatten a map back into long-format rows.
///
/// Variables and old values come out in map order, so
/// `compile(&to_rows(&map), ..)` reproduces `map`. Descriptions are not
/// part of the map and come back as `None`.
pub fn to_rows(map: &RecodingMap) -> Vec<CodebookRow> {
    map.iter()
        .flat_map(|(variable, recode)| {
            recode.iter().map(move |(old, label)| CodebookRow {
                variable: variable.to_string(),
                description: None,
                old_value: old.clone(),
                new_label: label.clone(),
            })
        })
        .collect()
}

/// Swap keys and labels of one variable's mapping.
///
/// Fails when two old values share a label, since the inverse would have to
/// pick one of them.
pub fn invert(variable: &str, recode: &VariableRecode) -> Result<VariableRecode> {
    let mut inverse = VariableRecode::new();
    for (old, label) in recode.iter() {
        if let Some(first) = inverse.get(label) {
            return Err(RecodeError::AmbiguousInverse {
                variable: variable.to_string(),
                label: label.to_string(),
                first: first.to_string(),
                second: old.to_string(),
            });
        }
        inverse.insert(label.clone(), old.clone());
    }
    Ok(inverse)
}
