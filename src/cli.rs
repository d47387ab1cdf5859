//! File based packing: read an input document, write the output document.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::api::PackResponse;
use crate::logging::log_event;
use crate::manifest::PackInput;
use crate::optimizer::{PackingConfig, pack_items_with_progress};

/// Packs the document at `input` and writes the result to `output`.
///
/// With `trace` set, every packing decision is written to the debug log.
///
/// # Returns
/// The response that was written
pub fn run_pack_file(
    input: &Path,
    output: &Path,
    config: PackingConfig,
    trace: bool,
) -> anyhow::Result<PackResponse> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Error reading input file {}", input.display()))?;
    let document: PackInput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", input.display()))?;
    log::debug!("Input JSON parsed successfully");

    let (container, items) = document.into_parts()?;
    log::debug!("Expanded into {} item instances", items.len());

    let result = pack_items_with_progress(&container, &items, config, |evt| {
        if trace {
            log_event(evt);
        }
    })?;

    let response = PackResponse::from_packing_result(result, &container);
    let json = serde_json::to_string_pretty(&response).context("Error generating output JSON")?;
    fs::write(output, json)
        .with_context(|| format!("Error writing output file {}", output.display()))?;

    Ok(response)
}
