use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use recode_cli::pipeline::{LoadedCodebook, apply, check, load_codebook};
use recode_ingest::{read_dataset_csv, write_dataset_csv, write_dataset_to};
use recode_model::CompileOptions;
use tracing::{info, info_span, warn};

use crate::cli::{ApplyArgs, CheckArgs, CodebookArgs, DuplicateArg, ShowArgs, ShowFormatArg};
use crate::summary::print_map_table;
use crate::types::{ApplyResult, CheckResult};

fn load(args: &CodebookArgs, options: &CompileOptions) -> Result<LoadedCodebook> {
    load_codebook(
        &args.codebook,
        &args.field_names(),
        args.value_parsing(),
        options,
    )
}

fn compile_options(on_duplicate: DuplicateArg) -> CompileOptions {
    CompileOptions::new().with_duplicates(on_duplicate.into())
}

pub fn run_apply(args: &ApplyArgs) -> Result<ApplyResult> {
    let span = info_span!("apply", data = %args.data.display());
    let _guard = span.enter();
    let start = Instant::now();

    let LoadedCodebook { map, .. } = load(&args.codebook, &compile_options(args.on_duplicate))?;
    let mut df = read_dataset_csv(&args.data)
        .with_context(|| format!("read dataset {}", args.data.display()))?;
    let rows = df.height();
    let outcome = apply(&mut df, &map, &args.columns, args.strict)?;

    let withheld = outcome.has_errors();
    let mut output = None;
    if withheld {
        warn!("strict mode: unlabelled values remain, output not written");
    } else if let Some(path) = &args.output {
        write_dataset_csv(&mut df, path)
            .with_context(|| format!("write {}", path.display()))?;
        output = Some(path.clone());
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_dataset_to(&mut df, &mut handle).context("write dataset to stdout")?;
        handle.flush().context("flush stdout")?;
    }

    info!(
        rows,
        replaced = outcome.report.replaced(),
        duration_ms = start.elapsed().as_millis(),
        "apply complete"
    );
    Ok(ApplyResult {
        codebook: args.codebook.codebook.clone(),
        data: args.data.clone(),
        output,
        rows,
        outcome,
        withheld,
    })
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let LoadedCodebook { map, .. } = load(&args.codebook, &compile_options(args.on_duplicate))?;
    match args.format {
        ShowFormatArg::Table => print_map_table(&map),
        ShowFormatArg::Json => {
            let json = serde_json::to_string_pretty(&map).context("serialize recoding map")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Always compiles with the overwrite policy so every conflict can be
/// listed instead of stopping at the first.
pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let span = info_span!("check", codebook = %args.codebook.codebook.display());
    let _guard = span.enter();

    let LoadedCodebook { rows, map } = load(&args.codebook, &CompileOptions::default())?;
    let df = match &args.data {
        Some(path) => Some(
            read_dataset_csv(path).with_context(|| format!("read dataset {}", path.display()))?,
        ),
        None => None,
    };
    let outcome = check(&rows, &map, df.as_ref())?;
    Ok(CheckResult {
        codebook: args.codebook.codebook.clone(),
        data: args.data.clone(),
        rows: rows.len(),
        variables: map.len(),
        outcome,
    })
}
