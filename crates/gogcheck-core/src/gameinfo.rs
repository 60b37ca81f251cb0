//! Local install metadata: `goggame-*.info` with `goggame-*.id` fallback.
//!
//! The installer drops an info file next to the game binaries; older installs
//! keep the build id in a separate id file instead.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builds::BuildIdentity;

/// Identity of the installed game as recorded by the installer.
#[derive(Debug, Clone)]
pub struct GameInfo {
    pub name: String,
    pub identity: BuildIdentity,
}

#[derive(Debug, Deserialize)]
struct InfoFile {
    name: String,
    #[serde(rename = "gameId", deserialize_with = "string_or_number")]
    game_id: String,
    #[serde(rename = "buildId", default, deserialize_with = "opt_string_or_number")]
    build_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdFile {
    #[serde(rename = "buildId", deserialize_with = "string_or_number")]
    build_id: String,
}

/// Accepts a JSON string or integer and renders it as a string. Ids must stay
/// opaque: some build ids do not survive a float round-trip.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Some)
}

/// First file under `dir` matching `pattern`, or a fatal error naming the
/// pattern that found nothing.
fn first_glob_match(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let mut matches =
        glob::glob(&full).with_context(|| format!("invalid glob pattern {full:?}"))?;
    match matches.next() {
        Some(entry) => entry.with_context(|| format!("reading glob match for {full:?}")),
        None => bail!("failed to find a file matching {full:?}"),
    }
}

/// Reads the game identity from the install directory. When the info file
/// lacks a build id, falls back to the id file.
pub fn read_game_info(install_dir: &Path) -> Result<GameInfo> {
    let info_path = first_glob_match(install_dir, "goggame-*.info")?;
    let data = fs::read_to_string(&info_path)
        .with_context(|| format!("reading {}", info_path.display()))?;
    let info: InfoFile = serde_json::from_str(&data)
        .with_context(|| format!("malformed info file {}", info_path.display()))?;

    let build_id = match info.build_id {
        Some(id) => id,
        None => {
            let id_path = first_glob_match(install_dir, "goggame-*.id")?;
            let data = fs::read_to_string(&id_path)
                .with_context(|| format!("reading {}", id_path.display()))?;
            let id: IdFile = serde_json::from_str(&data)
                .with_context(|| format!("malformed id file {}", id_path.display()))?;
            id.build_id
        }
    };

    Ok(GameInfo {
        name: info.name,
        identity: BuildIdentity {
            product_id: info.game_id,
            build_id,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_file_with_build_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("goggame-1207664643.info"),
            r#"{"name": "Example Game", "gameId": "1207664643",
                "buildId": "51727259307363981", "language": "English"}"#,
        )
        .unwrap();

        let info = read_game_info(dir.path()).unwrap();
        assert_eq!(info.name, "Example Game");
        assert_eq!(info.identity.product_id, "1207664643");
        assert_eq!(info.identity.build_id, "51727259307363981");
    }

    #[test]
    fn falls_back_to_id_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("goggame-42.info"),
            r#"{"name": "Old Game", "gameId": "42"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("goggame-42.id"),
            r#"{"buildId": 49571634819035615}"#,
        )
        .unwrap();

        let info = read_game_info(dir.path()).unwrap();
        assert_eq!(info.identity.build_id, "49571634819035615");
    }

    #[test]
    fn numeric_game_id_normalized_to_string() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("goggame-7.info"),
            r#"{"name": "N", "gameId": 7, "buildId": "1"}"#,
        )
        .unwrap();
        let info = read_game_info(dir.path()).unwrap();
        assert_eq!(info.identity.product_id, "7");
    }

    #[test]
    fn missing_info_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_game_info(dir.path()).unwrap_err();
        assert!(err.to_string().contains("goggame-*.info"));
    }

    #[test]
    fn missing_id_fallback_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("goggame-9.info"),
            r#"{"name": "N", "gameId": "9"}"#,
        )
        .unwrap();
        let err = read_game_info(dir.path()).unwrap_err();
        assert!(err.to_string().contains("goggame-*.id"));
    }
}
