use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ccommon::{BoxFuture, SessionId};
use cprovider::{Role, Turn};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::SessionStore;
use crate::error::SessionStoreError;

/// One JSON file per session under `root`.
///
/// Records use the Gemini content shape: `[{"role": "user", "parts": [{"text": "..."}]}]`.
#[derive(Debug)]
pub struct FilesystemSessionStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FilesystemSessionStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|error| {
            SessionStoreError::storage(format!(
                "failed to create history directory '{}': {error}",
                root.display()
            ))
        })?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self, session_id: &SessionId) -> PathBuf {
        self.root
            .join(format!("{}.json", session_file_name(session_id)))
    }

    fn load_record(&self, session_id: &SessionId) -> Result<Vec<Turn>, SessionStoreError> {
        let path = self.session_path(session_id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(SessionStoreError::storage(format!(
                    "failed to read session record '{}': {error}",
                    path.display()
                )));
            }
        };

        let record = serde_json::from_slice::<Vec<PersistedContent>>(&bytes).map_err(|error| {
            SessionStoreError::serialization(format!(
                "session record '{}' is corrupt: {error}",
                path.display()
            ))
        })?;

        record
            .into_iter()
            .map(PersistedContent::into_turn)
            .collect()
    }

    fn save_record(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), SessionStoreError> {
        let path = self.session_path(session_id);
        let record = turns
            .iter()
            .map(PersistedContent::from_turn)
            .collect::<Vec<_>>();
        let bytes = serde_json::to_vec_pretty(&record).map_err(|error| {
            SessionStoreError::serialization(format!("failed to serialize session record: {error}"))
        })?;

        write_atomic(&path, &bytes)
    }
}

impl SessionStore for FilesystemSessionStore {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, SessionStoreError>> {
        Box::pin(async move {
            let _guard = self
                .lock
                .lock()
                .map_err(|_| SessionStoreError::storage("filesystem store lock poisoned"))?;
            let turns = self.load_record(session_id)?;
            debug!(session_id = %session_id, turns = turns.len(), "loaded session history");
            Ok(turns)
        })
    }

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), SessionStoreError>> {
        Box::pin(async move {
            let _guard = self
                .lock
                .lock()
                .map_err(|_| SessionStoreError::storage("filesystem store lock poisoned"))?;
            self.save_record(session_id, turns)?;
            debug!(session_id = %session_id, turns = turns.len(), "saved session history");
            Ok(())
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedContent {
    role: String,
    #[serde(default)]
    parts: Vec<PersistedPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl PersistedContent {
    fn from_turn(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            parts: vec![PersistedPart {
                text: Some(turn.text.clone()),
            }],
        }
    }

    fn into_turn(self) -> Result<Turn, SessionStoreError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            SessionStoreError::serialization(format!("unknown role '{}' in session record", self.role))
        })?;
        let text = self
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>();
        Ok(Turn::new(role, text))
    }
}

/// File stem for a session id: the id itself when it is a plain portable name,
/// otherwise `~` followed by the lowercase hex of its bytes.
pub fn session_file_name(session_id: &SessionId) -> String {
    let id = session_id.as_str();
    let plain = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-'));

    if plain {
        id.to_string()
    } else {
        format!("~{}", hex_encode(id.as_bytes()))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SessionStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SessionStoreError::storage(
            "session record missing parent directory",
        ));
    };
    fs::create_dir_all(parent).map_err(|error| {
        SessionStoreError::storage(format!("failed to create parent directory: {error}"))
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|error| {
        SessionStoreError::storage(format!("failed to write temporary session record: {error}"))
    })?;

    // rename replaces the previous record in one step
    fs::rename(&tmp, path).map_err(|error| {
        let _ = fs::remove_file(&tmp);
        SessionStoreError::storage(format!("failed to finalize session record: {error}"))
    })
}

fn hex_encode(input: &[u8]) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for byte in input {
        output.push(nibble_to_hex(byte >> 4));
        output.push(nibble_to_hex(byte & 0x0f));
    }
    output
}

fn nibble_to_hex(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'a' + (nibble - 10)) as char,
    }
}
