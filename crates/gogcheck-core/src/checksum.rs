//! Whole-file MD5 and SHA-256 digests for verification.

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute a digest of a file and return it as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
fn digest_path<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn md5_path(path: &Path) -> Result<String> {
    digest_path::<Md5>(path)
}

pub fn sha256_path(path: &Path) -> Result<String> {
    digest_path::<Sha256>(path)
}
