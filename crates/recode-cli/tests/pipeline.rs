//! Integration tests for the pipeline module and the `recode` binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use recode_cli::pipeline::{apply, check, load_codebook};
use recode_ingest::{read_dataset_csv, write_dataset_to};
use recode_model::{CodeValue, CompileOptions, FieldNames, ValueParsing};
use tempfile::TempDir;

const CODEBOOK: &str = "\
column_name,description,old_values,new_labels
status,Application status,A,Accepted
status,Application status,R,Rejected
status,Application status,W,Waitlisted
gender,Applicant gender,1,Man
gender,Applicant gender,2,Woman
";

const DATASET: &str = "\
id,status,gender
1,A,1
2,W,2
3,R,3
4,X,
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn recode_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_recode"))
}

#[test]
fn apply_recodes_every_mapped_column() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let data = write_file(&dir, "data.csv", DATASET);

    let loaded = load_codebook(
        &codebook,
        &FieldNames::default(),
        ValueParsing::Infer,
        &CompileOptions::default(),
    )
    .expect("load codebook");
    assert_eq!(loaded.rows.len(), 5);
    assert_eq!(loaded.map.variables().collect::<Vec<_>>(), vec!["status", "gender"]);

    let mut df = read_dataset_csv(&data).expect("read dataset");
    let outcome = apply(&mut df, &loaded.map, &[], false).expect("apply");
    assert!(!outcome.has_errors());
    assert_eq!(outcome.report.replaced(), 5);

    let mut out = Vec::new();
    write_dataset_to(&mut df, &mut out).expect("write csv");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "id,status,gender\n1,Accepted,Man\n2,Waitlisted,Woman\n3,Rejected,3\n4,X,\n"
    );
}

#[test]
fn apply_with_unknown_column_fails_before_recoding() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let data = write_file(&dir, "data.csv", DATASET);
    let loaded = load_codebook(
        &codebook,
        &FieldNames::default(),
        ValueParsing::Infer,
        &CompileOptions::default(),
    )
    .expect("load codebook");
    let mut df = read_dataset_csv(&data).expect("read dataset");
    let before = df.clone();

    let error = apply(
        &mut df,
        &loaded.map,
        &["status".to_string(), "id".to_string()],
        false,
    )
    .expect_err("id is not mapped");

    assert!(format!("{error:#}").contains("column 'id' is not a variable in the recoding map"));
    assert!(df.equals_missing(&before));
}

#[test]
fn strict_apply_reports_leftovers_in_recoded_columns_only() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let data = write_file(&dir, "data.csv", DATASET);
    let loaded = load_codebook(
        &codebook,
        &FieldNames::default(),
        ValueParsing::Infer,
        &CompileOptions::default(),
    )
    .expect("load codebook");

    let mut df = read_dataset_csv(&data).expect("read dataset");
    let outcome = apply(&mut df, &loaded.map, &["status".to_string()], true).expect("apply");

    assert!(outcome.has_errors());
    assert_eq!(outcome.unexpected.len(), 1);
    assert_eq!(outcome.unexpected[0].column, "status");
    assert_eq!(outcome.unexpected[0].values, vec!["X"]);
}

#[test]
fn check_lists_collisions_chains_and_uncovered_values() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(
        &dir,
        "codebook.csv",
        "column_name,old_values,new_labels\n\
         g,M,Man\n\
         g,F,Woman\n\
         g,M,Male\n\
         grade,A,B\n\
         grade,B,C\n\
         region,N,North\n",
    );
    let data = write_file(&dir, "data.csv", "g,grade\nM,A\nU,B\n");
    let loaded = load_codebook(
        &codebook,
        &FieldNames::default(),
        ValueParsing::Infer,
        &CompileOptions::default(),
    )
    .expect("load codebook");
    let df = read_dataset_csv(&data).expect("read dataset");

    let outcome = check(&loaded.rows, &loaded.map, Some(&df)).expect("check");

    assert!(outcome.has_errors());
    assert_eq!(outcome.collisions.len(), 1);
    assert_eq!(outcome.collisions[0].first_row, 1);
    assert_eq!(outcome.collisions[0].second_row, 3);
    assert_eq!(outcome.chained.len(), 1);
    assert_eq!(outcome.chained[0].label, CodeValue::text("B"));
    assert_eq!(outcome.uncovered.len(), 1);
    assert_eq!(outcome.uncovered[0].column, "g");
    assert_eq!(outcome.uncovered[0].values, vec!["U"]);
    assert_eq!(outcome.missing_columns, vec!["region"]);
}

#[test]
fn clean_codebook_passes_check() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let loaded = load_codebook(
        &codebook,
        &FieldNames::default(),
        ValueParsing::Infer,
        &CompileOptions::default(),
    )
    .expect("load codebook");

    let outcome = check(&loaded.rows, &loaded.map, None).expect("check");

    assert!(!outcome.has_errors());
    assert!(outcome.chained.is_empty());
    assert!(outcome.missing_columns.is_empty());
}

#[test]
fn binary_apply_writes_output_file() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let data = write_file(&dir, "data.csv", DATASET);
    let output = dir.path().join("out.csv");

    let status = recode_bin()
        .arg("apply")
        .arg(&codebook)
        .arg(&data)
        .arg("--output")
        .arg(&output)
        .arg("--color")
        .arg("never")
        .status()
        .expect("run recode");

    assert!(status.success());
    let written = fs::read_to_string(&output).expect("read output");
    assert!(written.starts_with("id,status,gender\n1,Accepted,Man\n"));
}

#[test]
fn binary_strict_apply_withholds_output_and_fails() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);
    let data = write_file(&dir, "data.csv", DATASET);
    let output = dir.path().join("out.csv");

    let status = recode_bin()
        .arg("apply")
        .arg(&codebook)
        .arg(&data)
        .arg("--strict")
        .arg("-o")
        .arg(&output)
        .status()
        .expect("run recode");

    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn binary_show_prints_json_map() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(&dir, "codebook.csv", CODEBOOK);

    let output = recode_bin()
        .arg("show")
        .arg(&codebook)
        .arg("--format")
        .arg("json")
        .output()
        .expect("run recode");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(
        json,
        serde_json::json!({
            "status": {"A": "Accepted", "R": "Rejected", "W": "Waitlisted"},
            "gender": {"1": "Man", "2": "Woman"}
        })
    );
}

#[test]
fn binary_reject_policy_fails_on_conflicting_duplicates() {
    let dir = TempDir::new().expect("temp dir");
    let codebook = write_file(
        &dir,
        "codebook.csv",
        "column_name,old_values,new_labels\ng,M,Man\ng,M,Male\n",
    );

    let output = recode_bin()
        .arg("show")
        .arg(&codebook)
        .arg("--on-duplicate")
        .arg("reject")
        .output()
        .expect("run recode");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("old value 'M' maps to both 'Man' and 'Male'"));
}
