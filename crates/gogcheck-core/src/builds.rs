//! Remote builds listing (generation 2) and build-record lookup.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::GogcheckConfig;
use crate::fetch;
use crate::gameinfo::string_or_number;
use crate::options::Platform;

/// Identifies exactly one published build of one product. Created once per
/// run, either from local metadata or directly from CLI arguments.
#[derive(Debug, Clone)]
pub struct BuildIdentity {
    pub product_id: String,
    pub build_id: String,
}

/// One entry of the builds listing for a product/platform pair.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRecord {
    /// Opaque build identifier. Kept as a string: some ids exceed 2^53 and
    /// would lose precision in any float-backed representation.
    #[serde(deserialize_with = "string_or_number")]
    pub build_id: String,
    /// URL of this build's zlib-compressed content descriptor.
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildsListing {
    pub items: Vec<BuildRecord>,
}

pub fn builds_url(cfg: &GogcheckConfig, product_id: &str, platform: Platform) -> String {
    format!(
        "{}/products/{}/os/{}/builds?generation=2",
        cfg.content_system_base,
        product_id,
        platform.as_str()
    )
}

fn select_build(listing: BuildsListing, build_id: &str) -> Option<BuildRecord> {
    // Exact string equality; build ids are never compared numerically.
    listing.items.into_iter().find(|b| b.build_id == build_id)
}

/// Fetches the platform's builds listing and selects the record matching
/// `build_id`. A missing match or any transport failure is fatal.
pub fn locate_build(
    cfg: &GogcheckConfig,
    product_id: &str,
    platform: Platform,
    build_id: &str,
) -> Result<BuildRecord> {
    let url = builds_url(cfg, product_id, platform);
    let listing: BuildsListing = fetch::fetch_json(&url)?;
    select_build(listing, build_id)
        .with_context(|| format!("no build with id {build_id} in {url}"))
}
