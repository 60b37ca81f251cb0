//! Content descriptors and per-depot file listings (content-system v2 meta).

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::builds::BuildRecord;
use crate::config::GogcheckConfig;
use crate::fetch;

/// Decompressed content descriptor of one build.
#[derive(Debug, Deserialize)]
pub struct ContentDescriptor {
    pub depots: Vec<Depot>,
}

/// A language-tagged subset of a build's content, identified by a manifest hash.
#[derive(Debug, Clone, Deserialize)]
pub struct Depot {
    /// Content-addressed identifier of the depot's file listing.
    pub manifest: String,
    /// Language tags; `"*"` marks a depot that applies to every language.
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chunk {
    pub md5: String,
}

/// Raw item of a depot listing: a directory marker or a file record.
#[derive(Debug, Clone, Deserialize)]
pub struct DepotItem {
    /// Path as authored on the source platform (backslashes for windows).
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
    /// Whole-file md5; only guaranteed present for multi-chunk files.
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl DepotItem {
    pub fn is_dir(&self) -> bool {
        self.kind == "DepotDirectory"
    }
}

#[derive(Debug, Deserialize)]
pub struct DepotListing {
    pub depot: DepotItems,
}

#[derive(Debug, Deserialize)]
pub struct DepotItems {
    pub items: Vec<DepotItem>,
}

/// A depot applies iff the filter is `"*"`, the filter is listed, or the
/// depot itself carries the wildcard tag.
pub fn depot_matches_language(depot: &Depot, language: &str) -> bool {
    language == "*" || depot.languages.iter().any(|l| l == language || l == "*")
}

/// CDN meta location of a depot listing: first-2-chars/next-2-chars/full-id.
pub fn meta_url(cfg: &GogcheckConfig, manifest: &str) -> Result<String> {
    if manifest.len() < 4 || !manifest.is_ascii() {
        bail!("malformed manifest id {manifest:?}");
    }
    Ok(format!(
        "{}/content-system/v2/meta/{}/{}/{}",
        cfg.cdn_base,
        &manifest[..2],
        &manifest[2..4],
        manifest
    ))
}

/// Fetches the build's content descriptor and the listing of every depot
/// matching `language`, yielding raw items in manifest order. Any network or
/// decode failure aborts the run; there is no per-depot recovery.
pub fn fetch_depot_items(
    cfg: &GogcheckConfig,
    record: &BuildRecord,
    language: &str,
) -> Result<Vec<DepotItem>> {
    let descriptor: ContentDescriptor = fetch::fetch_zlib_json(&record.link)?;
    let mut items = Vec::new();
    for depot in &descriptor.depots {
        if !depot_matches_language(depot, language) {
            tracing::debug!(
                "skipping depot {} (languages {:?}, filter {})",
                depot.manifest,
                depot.languages,
                language
            );
            continue;
        }
        let url = meta_url(cfg, &depot.manifest)?;
        tracing::info!("fetching depot listing {}", url);
        let listing: DepotListing = fetch::fetch_zlib_json(&url)?;
        items.extend(listing.depot.items);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot(languages: &[&str]) -> Depot {
        Depot {
            manifest: "0123abcd".to_string(),
            languages: languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn language_filter_truth_table() {
        // filter="*" matches everything, even an empty tag set
        assert!(depot_matches_language(&depot(&[]), "*"));
        assert!(depot_matches_language(&depot(&["en-US"]), "*"));
        // literal membership
        assert!(depot_matches_language(&depot(&["en-US", "fr-FR"]), "en-US"));
        assert!(!depot_matches_language(&depot(&["en-US"]), "fr-FR"));
        // wildcard tag on the depot side
        assert!(depot_matches_language(&depot(&["*"]), "en-US"));
        assert!(depot_matches_language(&depot(&["de-DE", "*"]), "ja-JP"));
        // neither side matches
        assert!(!depot_matches_language(&depot(&[]), "en-US"));
    }

    #[test]
    fn meta_url_prefix_segments() {
        let cfg = GogcheckConfig::default();
        let url = meta_url(&cfg, "f1e2d3c4b5a69788").unwrap();
        assert_eq!(
            url,
            "https://cdn.gog.com/content-system/v2/meta/f1/e2/f1e2d3c4b5a69788"
        );
    }

    #[test]
    fn meta_url_rejects_short_or_non_ascii_ids() {
        let cfg = GogcheckConfig::default();
        assert!(meta_url(&cfg, "ab").is_err());
        assert!(meta_url(&cfg, "ábcdëf").is_err());
    }

    #[test]
    fn content_descriptor_decodes() {
        let d: ContentDescriptor = serde_json::from_str(
            r#"{"baseProductId": "1", "depots": [
                {"manifest": "aabbcc", "languages": ["en-US"], "size": 123},
                {"manifest": "ddeeff", "languages": ["*"], "productId": "1"}
            ], "installDirectory": "Game"}"#,
        )
        .unwrap();
        assert_eq!(d.depots.len(), 2);
        assert_eq!(d.depots[0].manifest, "aabbcc");
        assert_eq!(d.depots[1].languages, vec!["*"]);
    }

    #[test]
    fn depot_listing_decodes_items() {
        let l: DepotListing = serde_json::from_str(
            r#"{"depot": {"items": [
                {"path": "bin", "type": "DepotDirectory"},
                {"path": "bin\\game.exe", "type": "DepotFile",
                 "chunks": [{"md5": "aa", "size": 10}], "sha256": "ff"},
                {"path": "data.pak", "type": "DepotFile",
                 "chunks": [{"md5": "aa"}, {"md5": "bb"}], "md5": "cc"}
            ]}, "version": 2}"#,
        )
        .unwrap();
        let items = &l.depot.items;
        assert_eq!(items.len(), 3);
        assert!(items[0].is_dir());
        assert!(items[0].chunks.is_empty());
        assert!(!items[1].is_dir());
        assert_eq!(items[1].sha256.as_deref(), Some("ff"));
        assert_eq!(items[2].chunks.len(), 2);
        assert_eq!(items[2].md5.as_deref(), Some("cc"));
    }
}
