use super::graph::FormGraph;
use crate::error::SnapshotError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// Bumped whenever the serialized graph shape changes incompatibly.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// An owned, immutable copy of a form graph taken at one point in time.
///
/// Exports and previews work on a snapshot instead of the live editor state,
/// so later edits can never tear what they are reading.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub format_version: u32,
    pub revision: u64,
    pub graph: FormGraph,
}

impl FormSnapshot {
    pub fn new(graph: FormGraph, revision: u64) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            revision,
            graph,
        }
    }

    /// Renders the snapshot as pretty JSON for the persistence layer.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.check_version()
    }

    /// Encodes the snapshot in the compact bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot) // bincode 2 returns (data, bytes_read)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.check_version()
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a snapshot previously written by [`FormSnapshot::save`].
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let mut file = fs::File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SnapshotError::Io {
                path: path.to_string(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        Ok(self)
    }
}
