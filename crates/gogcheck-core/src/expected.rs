//! Normalized expected entries and the remote half of the pipeline.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::builds::{self, BuildIdentity};
use crate::config::GogcheckConfig;
use crate::manifest::{self, DepotItem};
use crate::options::Platform;

/// md5 of the empty byte sequence; the canonical hash of a zero-chunk file.
pub const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// One expected file or directory of an installation, with the path rendered
/// using the local separator convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedEntry {
    pub path: PathBuf,
    /// Always present for files, never for directories.
    pub md5: Option<String>,
    /// Optional; only compared when the manifest provides it.
    pub sha256: Option<String>,
    pub is_dir: bool,
}

/// Splits `raw` under the source platform's path grammar and re-renders it
/// with the local separator. Windows paths accept both separators; POSIX
/// paths only the forward slash (a backslash is an ordinary name character).
fn normalize_path(raw: &str, platform: Platform) -> PathBuf {
    let parts: Vec<&str> = match platform {
        Platform::Windows => raw.split(['\\', '/']).collect(),
        Platform::Osx => raw.split('/').collect(),
    };
    let mut path = PathBuf::new();
    for part in parts {
        if !part.is_empty() && part != "." {
            path.push(part);
        }
    }
    path
}

/// Whole-file md5 per the chunk-count rule: zero chunks is the empty file,
/// one chunk stands in for the whole file, more requires the explicit field.
fn file_md5(item: &DepotItem) -> Result<String> {
    match item.chunks.len() {
        0 => Ok(EMPTY_MD5.to_string()),
        1 => Ok(item.chunks[0].md5.clone()),
        _ => item
            .md5
            .clone()
            .with_context(|| format!("multi-chunk item {:?} has no whole-file md5", item.path)),
    }
}

/// Turns a raw depot item into an expected entry. Pure; the authoring
/// platform is an explicit parameter, never read from the environment.
pub fn normalize(item: &DepotItem, platform: Platform) -> Result<ExpectedEntry> {
    let path = normalize_path(&item.path, platform);
    if item.is_dir() {
        return Ok(ExpectedEntry {
            path,
            md5: None,
            sha256: None,
            is_dir: true,
        });
    }
    Ok(ExpectedEntry {
        path,
        md5: Some(file_md5(item)?),
        sha256: item.sha256.clone(),
        is_dir: false,
    })
}

/// Remote half of the pipeline: locate the build, fetch the listings of its
/// qualifying depots, normalize every item. Order follows the manifest.
pub fn expected_entries(
    cfg: &GogcheckConfig,
    identity: &BuildIdentity,
    platform: Platform,
    language: &str,
) -> Result<Vec<ExpectedEntry>> {
    let record = builds::locate_build(cfg, &identity.product_id, platform, &identity.build_id)?;
    let items = manifest::fetch_depot_items(cfg, &record, language)?;
    items.iter().map(|item| normalize(item, platform)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Chunk;
    use std::path::Path;

    fn file_item(path: &str, chunks: &[&str], md5: Option<&str>, sha256: Option<&str>) -> DepotItem {
        DepotItem {
            path: path.to_string(),
            kind: "DepotFile".to_string(),
            chunks: chunks
                .iter()
                .map(|m| Chunk {
                    md5: m.to_string(),
                })
                .collect(),
            md5: md5.map(str::to_string),
            sha256: sha256.map(str::to_string),
        }
    }

    fn dir_item(path: &str) -> DepotItem {
        DepotItem {
            path: path.to_string(),
            kind: "DepotDirectory".to_string(),
            chunks: Vec::new(),
            md5: None,
            sha256: None,
        }
    }

    #[test]
    fn single_chunk_md5_stands_in() {
        let entry = normalize(&file_item("a.txt", &["abc123"], None, None), Platform::Osx).unwrap();
        assert_eq!(entry.md5.as_deref(), Some("abc123"));
        assert!(!entry.is_dir);
    }

    #[test]
    fn zero_chunks_is_empty_file() {
        let entry = normalize(&file_item("empty.bin", &[], None, None), Platform::Osx).unwrap();
        assert_eq!(entry.md5.as_deref(), Some(EMPTY_MD5));
    }

    #[test]
    fn multi_chunk_uses_whole_file_md5() {
        let item = file_item("big.pak", &["c1", "c2"], Some("whole"), None);
        let entry = normalize(&item, Platform::Osx).unwrap();
        assert_eq!(entry.md5.as_deref(), Some("whole"));
    }

    #[test]
    fn multi_chunk_without_md5_is_an_error() {
        let item = file_item("big.pak", &["c1", "c2"], None, None);
        assert!(normalize(&item, Platform::Osx).is_err());
    }

    #[test]
    fn sha256_carried_when_present() {
        let with = normalize(
            &file_item("a", &["m"], None, Some("deadbeef")),
            Platform::Osx,
        )
        .unwrap();
        assert_eq!(with.sha256.as_deref(), Some("deadbeef"));
        let without = normalize(&file_item("a", &["m"], None, None), Platform::Osx).unwrap();
        assert!(without.sha256.is_none());
    }

    #[test]
    fn directory_marker_has_no_hashes() {
        let entry = normalize(&dir_item("bin"), Platform::Windows).unwrap();
        assert!(entry.is_dir);
        assert!(entry.md5.is_none());
        assert!(entry.sha256.is_none());
    }

    #[test]
    fn windows_path_rendered_with_local_separator() {
        let entry = normalize(
            &file_item("bin\\x64\\game.exe", &["m"], None, None),
            Platform::Windows,
        )
        .unwrap();
        assert_eq!(entry.path, Path::new("bin").join("x64").join("game.exe"));
    }

    #[test]
    fn windows_grammar_accepts_forward_slashes() {
        let back = normalize_path("a\\b\\c.txt", Platform::Windows);
        let forward = normalize_path("a/b/c.txt", Platform::Windows);
        assert_eq!(back, forward);
    }

    #[test]
    fn osx_path_keeps_backslash_as_name_character() {
        let p = normalize_path("dir/odd\\name", Platform::Osx);
        assert_eq!(p, Path::new("dir").join("odd\\name"));
    }

    #[test]
    fn normalization_is_idempotent_for_plain_paths() {
        // A path with no platform-specific characters normalizes identically
        // regardless of which grammar authored it.
        let a = normalize_path("data/files/a.txt", Platform::Osx);
        let b = normalize_path("data/files/a.txt", Platform::Windows);
        assert_eq!(a, b);
        // Windows grammar accepts either separator, so re-parsing a rendered
        // path is a no-op on any host.
        let again = normalize_path(&a.to_string_lossy(), Platform::Windows);
        assert_eq!(again, a);
    }

    #[test]
    fn empty_and_dot_components_dropped() {
        assert_eq!(
            normalize_path("./a//b/", Platform::Osx),
            Path::new("a").join("b")
        );
    }
}
