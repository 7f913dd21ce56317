//! Blueprint storage backends
//!
//! Loading is I/O-bound and runs off the world task; the store hands a
//! parsed [`Blueprint`] back for planning. The binary `.schem` parser is
//! a collaborator behind the [`BlueprintStore`] trait; the shipped
//! file store reads a JSON placement list with the same contract.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;

use crate::blueprint::{Blueprint, BlueprintEntry};
use crate::core::error::Error;
use crate::core::types::Result;

/// Validate a blueprint id against `^[a-z0-9-]+$`.
///
/// Runs before any file access so a malicious id can never reach the
/// filesystem.
pub fn validate_blueprint_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidBlueprintId(id.to_string()))
    }
}

/// Source of blueprints, keyed by id.
pub trait BlueprintStore: Send + Sync + 'static {
    /// Load a blueprint. Implementations must validate the id before
    /// touching any backing resource.
    fn load(&self, id: &str) -> impl Future<Output = Result<Blueprint>> + Send;
}

/// Blueprint store backed by a directory of `<id>.json` files, each
/// holding an array of [`BlueprintEntry`] values.
#[derive(Debug, Clone)]
pub struct FileBlueprintStore {
    dir: PathBuf,
}

impl FileBlueprintStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Count the blueprints on disk. Used for the startup library log
    /// line; not on any hot path.
    pub fn available(&self) -> Result<usize> {
        let mut count = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl BlueprintStore for FileBlueprintStore {
    fn load(&self, id: &str) -> impl Future<Output = Result<Blueprint>> + Send {
        let id = id.to_string();
        let dir = self.dir.clone();
        async move {
            validate_blueprint_id(&id)?;
            let path = dir.join(format!("{id}.json"));
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(Error::BlueprintNotFound(id));
                }
                Err(e) => return Err(e.into()),
            };
            let entries: Vec<BlueprintEntry> = serde_json::from_slice(&bytes)
                .map_err(|e| Error::Blueprint(format!("{id}: {e}")))?;
            Ok(Blueprint::new(id, entries))
        }
    }
}

/// In-memory blueprint store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBlueprintStore {
    blueprints: HashMap<String, Vec<BlueprintEntry>>,
}

impl MemoryBlueprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, entries: Vec<BlueprintEntry>) {
        self.blueprints.insert(id.into(), entries);
    }
}

impl BlueprintStore for MemoryBlueprintStore {
    fn load(&self, id: &str) -> impl Future<Output = Result<Blueprint>> + Send {
        let result = validate_blueprint_id(id).and_then(|()| {
            self.blueprints
                .get(id)
                .cloned()
                .map(|entries| Blueprint::new(id, entries))
                .ok_or_else(|| Error::BlueprintNotFound(id.to_string()))
        });
        async move { result }
    }
}
