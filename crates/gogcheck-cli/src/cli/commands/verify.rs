//! `gogcheck verify` – reconcile an installed game against its manifest.

use anyhow::Result;
use gogcheck_core::config::GogcheckConfig;
use gogcheck_core::options::VerifyOptions;
use gogcheck_core::{expected, gameinfo, reconcile};
use std::path::Path;

use super::Console;

/// Runs the full pipeline: local metadata, build lookup, depot fetch,
/// reconciliation, report. Returns Ok(true) when every entry verified OK.
pub fn run_verify(cfg: &GogcheckConfig, opts: &VerifyOptions, path: &Path) -> Result<bool> {
    let console = Console::new(opts.quiet);

    let info = gameinfo::read_game_info(path)?;
    console.out(format!(
        "# Name: {}\n# Game ID: {}\n# Build ID: {}",
        info.name, info.identity.product_id, info.identity.build_id
    ));

    let entries = expected::expected_entries(cfg, &info.identity, opts.platform, &opts.language)?;
    tracing::info!(
        "verifying {} entries for build {}",
        entries.len(),
        info.identity.build_id
    );
    let report = reconcile::reconcile(path, &entries)?;

    if !report.unexpected.is_empty() {
        console.out("\n# Unexpected files:");
        for path in &report.unexpected {
            console.out(path.display());
        }
    }

    console.out("\n# Expected files:");
    for result in &report.entries {
        let description = if result.entry.is_dir {
            "directory"
        } else {
            result.entry.md5.as_deref().unwrap_or("-")
        };
        console.out(format!(
            "{} ({}): {}",
            result.entry.path.display(),
            description,
            result.describe()
        ));
    }

    let clean = report.is_clean();
    if !clean {
        console.err("\n# Errors:");
        for result in report.errors() {
            console.err(format!(
                "{}: {}",
                result.entry.path.display(),
                result.describe()
            ));
        }
    }
    Ok(clean)
}
