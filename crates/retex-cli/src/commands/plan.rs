//! Plan command implementation
//!
//! Lists the texture slots a glTF document would import, without
//! fetching any image bytes.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::planner;
use crate::report::{PlanReport, SlotPlan};

/// Run the plan command
///
/// # Arguments
/// * `input` - Path to the .gltf or .glb document
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    let (document, blob, base_dir) = planner::load_document(Path::new(input))
        .with_context(|| format!("failed to open '{input}'"))?;
    let descriptors = planner::plan_document(&document, blob, &base_dir)
        .with_context(|| format!("failed to plan imports for '{input}'"))?;

    let report = PlanReport {
        input: input.to_string(),
        slots: descriptors.iter().map(SlotPlan::from_descriptor).collect(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Planning:".cyan().bold(), input);
    if report.slots.is_empty() {
        println!("  {}", "no material textures found".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    for slot in &report.slots {
        if slot.requires_conversion {
            println!(
                "  {} {} ({}) -> {} [{}]",
                "pack".yellow(),
                slot.name,
                slot.texture_type,
                slot.converted_file_name.as_deref().unwrap_or(""),
                slot.channels.join(", "),
            );
        } else {
            println!(
                "  {} {} ({}) -> {}",
                "copy".green(),
                slot.name,
                slot.texture_type,
                slot.file_name,
            );
        }
    }
    println!(
        "\n{} {} slot(s) planned",
        "Done:".cyan().bold(),
        report.slots.len()
    );

    Ok(ExitCode::SUCCESS)
}
