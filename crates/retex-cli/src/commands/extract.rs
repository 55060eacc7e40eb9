//! Extract command implementation
//!
//! Runs conversion dispatch over every planned slot and writes the
//! results. One slot's failure never aborts the others; the exit code
//! reports whether any slot failed.

use anyhow::{Context, Result};
use colored::Colorize;
use retex_convert::{dispatch_all, ChannelFailurePolicy, DirectoryStore, TextureStore};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use crate::planner;
use crate::report::{ExtractReport, OutputEntry, SlotError};

/// Run the extract command
///
/// # Arguments
/// * `input` - Path to the .gltf or .glb document
/// * `out_root` - Directory converted textures are written into
/// * `json_output` - Whether to output machine-readable JSON
/// * `substitute_defaults` - Treat failed non-primary channels like
///   absent ones instead of failing the slot
///
/// # Returns
/// Exit code: 0 if every slot succeeded, 1 otherwise
pub async fn run(
    input: &str,
    out_root: &str,
    json_output: bool,
    substitute_defaults: bool,
) -> Result<ExitCode> {
    let start = Instant::now();

    let (document, blob, base_dir) = planner::load_document(Path::new(input))
        .with_context(|| format!("failed to open '{input}'"))?;
    let descriptors = planner::plan_document(&document, blob, &base_dir)
        .with_context(|| format!("failed to plan imports for '{input}'"))?;

    let store = DirectoryStore::create(out_root)
        .with_context(|| format!("failed to create output directory '{out_root}'"))?;

    let policy = if substitute_defaults {
        ChannelFailurePolicy::SubstituteDefault
    } else {
        ChannelFailurePolicy::Propagate
    };

    let mut outputs = Vec::new();
    let mut errors = Vec::new();
    for slot_result in dispatch_all(&descriptors, policy).await {
        match slot_result.result {
            Ok(converted) => match store.write(&converted.file_name, &converted.bytes) {
                Ok(()) => outputs.push(OutputEntry {
                    slot: slot_result.slot,
                    hash: blake3::hash(&converted.bytes).to_hex().to_string(),
                    bytes: converted.bytes.len(),
                    recombined: converted.recombined,
                    file_name: converted.file_name,
                }),
                Err(err) => errors.push(SlotError {
                    slot: slot_result.slot,
                    message: err.to_string(),
                }),
            },
            Err(err) => errors.push(SlotError {
                slot: slot_result.slot,
                message: err.to_string(),
            }),
        }
    }

    let report = ExtractReport {
        input: input.to_string(),
        out_root: out_root.to_string(),
        ok: errors.is_empty(),
        outputs,
        errors,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report);
    }

    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_human(report: &ExtractReport) {
    println!("{} {}", "Extracting:".cyan().bold(), report.input);

    for output in &report.outputs {
        let action = if output.recombined {
            "packed".yellow()
        } else {
            "copied".green()
        };
        println!(
            "  {} {} -> {} ({} bytes)",
            action, output.slot, output.file_name, output.bytes
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &report.errors {
            println!("  {} {}: {}", "failed".red(), error.slot, error.message);
        }
    }

    println!(
        "\n{} {} written, {} failed in {} ms",
        "Done:".cyan().bold(),
        report.outputs.len(),
        report.errors.len(),
        report.duration_ms
    );
}
