//! `gogcheck dump-md5sums` – print official checksums in md5sum format.

use anyhow::Result;
use gogcheck_core::builds::BuildIdentity;
use gogcheck_core::config::GogcheckConfig;
use gogcheck_core::expected;
use gogcheck_core::options::VerifyOptions;

use gogcheck_core::expected::ExpectedEntry;

use super::Console;

/// md5sum-format line for a file entry; None for directory markers.
fn md5sum_line(entry: &ExpectedEntry) -> Option<String> {
    if entry.is_dir {
        return None;
    }
    entry
        .md5
        .as_ref()
        .map(|md5| format!("{}  {}", md5, entry.path.display()))
}

/// Prints `{md5}  {path}` for every file entry of the build, in manifest
/// order. Directories are skipped; the local filesystem is never touched.
pub fn run_dump_md5sums(
    cfg: &GogcheckConfig,
    opts: &VerifyOptions,
    product_id: String,
    build_id: String,
) -> Result<()> {
    let identity = BuildIdentity {
        product_id,
        build_id,
    };
    let entries = expected::expected_entries(cfg, &identity, opts.platform, &opts.language)?;

    let console = Console::new(opts.quiet);
    for line in entries.iter().filter_map(md5sum_line) {
        console.out(line);
    }
    Ok(())
}
