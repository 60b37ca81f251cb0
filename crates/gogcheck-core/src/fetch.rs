//! HTTP GET of content-system documents over libcurl.
//!
//! Every network failure is fatal for the run, so errors carry the failing
//! URL and the underlying reason. No retries, no caching between runs.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;

/// Error for a single document fetch. Classified so messages always name the
/// endpoint that failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// libcurl failed (DNS, connect, timeout, TLS, ...).
    #[error("failed to retrieve {url}: {source}")]
    Transport { url: String, source: curl::Error },
    /// The server answered with a non-2xx status.
    #[error("failed to retrieve {url}: HTTP {code}")]
    Http { url: String, code: u32 },
}

/// Fetches `url` and returns the raw response body.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    let code = perform(url, &mut body).map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            url: url.to_string(),
            code,
        });
    }
    tracing::debug!("GET {} -> {} ({} bytes)", url, code, body.len());
    Ok(body)
}

fn perform(url: &str, body: &mut Vec<u8>) -> Result<u32, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(300))?;
    easy.useragent(concat!("gogcheck/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    easy.response_code()
}

/// Fetches a plain-JSON document (the builds listing).
pub fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let body = fetch_bytes(url)?;
    serde_json::from_slice(&body).with_context(|| format!("malformed JSON from {url}"))
}

/// Fetches a zlib-compressed JSON document (content descriptors and depot listings).
pub fn fetch_zlib_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let body = fetch_bytes(url)?;
    let inflated = inflate(&body).with_context(|| format!("zlib inflate of {url} failed"))?;
    serde_json::from_slice(&inflated).with_context(|| format!("malformed JSON from {url}"))
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn inflate_zlib_payload() {
        let payload = br#"{"depots": []}"#;
        let inflated = inflate(&deflate(payload)).unwrap();
        assert_eq!(inflated, payload);
    }

    #[test]
    fn inflate_rejects_garbage() {
        assert!(inflate(b"definitely not zlib").is_err());
    }

    #[test]
    fn fetch_error_names_url() {
        let err = FetchError::Http {
            url: "https://cdn.example/meta/ab/cd/abcd".to_string(),
            code: 404,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://cdn.example/meta/ab/cd/abcd"));
        assert!(msg.contains("404"));
    }
}
