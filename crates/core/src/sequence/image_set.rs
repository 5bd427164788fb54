use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::IMAGE_SUFFIX;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("failed to read folder {path}: {source}")]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read an entry of {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The sorted stills of one input folder, in encode order.
///
/// Holds bare file names; [`ImageSet::path_of`] joins them back onto
/// the scanned folder. Order is plain byte-wise string comparison, so
/// `frame10.jpeg` sorts before `frame2.jpeg`. Recordings that need
/// temporal order must zero-pad their numbering.
#[derive(Clone, Debug)]
pub struct ImageSet {
    dir: PathBuf,
    names: Vec<String>,
}

impl ImageSet {
    /// Scans the top level of `dir` for regular files whose name ends
    /// in `.jpeg` and sorts them. Subfolders are never entered, other
    /// extensions are skipped, and an empty result is not an error.
    pub fn scan(dir: &Path) -> Result<Self, SequenceError> {
        let entries = fs::read_dir(dir).map_err(|source| SequenceError::ReadFolder {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SequenceError::ReadEntry {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            // Names that are not valid UTF-8 cannot match the suffix.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(IMAGE_SUFFIX) {
                names.push(name);
            }
        }
        names.sort_unstable();

        Ok(Self {
            dir: dir.to_path_buf(),
            names,
        })
    }

    /// The scanned folder.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names in encode order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the still that will become frame 0, if any.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Full path of one member name.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}
