//! JSON transcripts of diagnosis sessions.
//!
//! One file per session under the transcript directory, rewritten after every
//! controller operation so the latest state survives a crash.

use crate::session::{ChatLog, Session};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Canonical file extension for transcripts.
const TRANSCRIPT_FILE_EXT: &str = "json";
/// On-disk schema version for [`Transcript`].
const TRANSCRIPT_FILE_VERSION: u32 = 1;

/// On-disk payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    /// File-format version for forward compatibility checks.
    pub version: u32,
    /// File key: the planner's session id, or a local stamp before one exists.
    pub id: String,
    pub updated_at_millis: u64,
    pub session: Session,
    pub messages: ChatLog,
}

/// Filesystem-backed transcript directory.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    /// Open/create a transcript directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, String> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            format!(
                "failed to create transcript directory {}: {e}",
                dir.display()
            )
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the transcript for `session`, keyed by its id or `fallback_key`.
    ///
    /// Returns the path written.
    pub fn save(
        &self,
        session: &Session,
        log: &ChatLog,
        fallback_key: &str,
    ) -> Result<PathBuf, String> {
        let id = transcript_key(session.id(), fallback_key);
        let payload = Transcript {
            version: TRANSCRIPT_FILE_VERSION,
            id: id.clone(),
            updated_at_millis: now_unix_millis(),
            session: session.clone(),
            messages: log.clone(),
        };
        let json = serde_json::to_vec_pretty(&payload)
            .map_err(|e| format!("failed to serialize transcript {id}: {e}"))?;
        let path = self.transcript_path(&id);
        // Write a sibling temp file first so a partial write never replaces
        // the last good transcript.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            format!(
                "failed to write temporary transcript {}: {e}",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            format!(
                "failed to move transcript into place {}: {e}",
                path.display()
            )
        })?;
        tracing::debug!(path = %path.display(), "transcript saved");
        Ok(path)
    }

    /// Read a transcript back by key.
    pub fn load(&self, id: &str) -> Result<Transcript, String> {
        let path = self.transcript_path(&sanitize_key(id));
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read transcript {}: {e}", path.display()))?;
        let payload: Transcript = serde_json::from_str(&raw)
            .map_err(|e| format!("failed to parse transcript {}: {e}", path.display()))?;
        if payload.version != TRANSCRIPT_FILE_VERSION {
            return Err(format!(
                "unsupported transcript version {} for {}",
                payload.version,
                path.display()
            ));
        }
        Ok(payload)
    }

    fn transcript_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{TRANSCRIPT_FILE_EXT}"))
    }
}

/// Local key used until the planner assigns a session id.
pub fn local_stamp() -> String {
    format!("local-{}", now_unix_millis())
}

fn transcript_key(session_id: Option<&str>, fallback: &str) -> String {
    session_id
        .map(sanitize_key)
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| sanitize_key(fallback))
}

/// Planner ids are opaque; keep only filename-safe characters.
fn sanitize_key(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches('_').to_string()
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
