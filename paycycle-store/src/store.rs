//! Snapshot storage: the collaborator interface and a directory-backed store.

use anyhow::{Context, Result};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::label::{LABEL_PREFIX, SnapshotLabel, latest_label};
use crate::snapshot::{Snapshot, read_snapshot, write_snapshot};

const EXTENSION: &str = "csv";

/// Named snapshot storage. Failures surface as absent/empty results, except
/// for `save`, which reports why it failed. No retries happen here.
pub trait SnapshotStore {
    /// `None` when the label does not exist or cannot be read.
    fn load(&self, label: &str) -> Option<Snapshot>;

    /// Write (or overwrite) the snapshot under `label`. Last write wins.
    fn save(&self, label: &str, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Every stored label; empty when the listing fails.
    fn list_labels(&self) -> Vec<String>;

    /// The label that parses to the latest month.
    fn latest(&self) -> Option<String> {
        latest_label(&self.list_labels()).map(str::to_string)
    }
}

/// Stores each snapshot as `<dir>/<label>.csv`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", strip_extension(label)))
    }

    fn try_load(&self, label: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(label);
        if !path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let snapshot =
            read_snapshot(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn try_list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut labels = Vec::new();
        for entry in fs::read_dir(&self.dir).with_context(|| format!("listing {}", self.dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.contains(LABEL_PREFIX) {
                    labels.push(stem.to_string());
                }
            }
        }
        labels.sort();
        Ok(labels)
    }
}

impl SnapshotStore for DirStore {
    fn load(&self, label: &str) -> Option<Snapshot> {
        match self.try_load(label) {
            Ok(Some(snapshot)) => {
                debug!(label, bills = snapshot.bills.len(), "loaded snapshot");
                Some(snapshot)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(label, error = %format!("{e:#}"), "could not load snapshot");
                None
            }
        }
    }

    fn save(&self, label: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        validate_label(label)?;
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.path_for(label);
        let tmp = path.with_extension("tmp");

        let file = fs::File::create(&tmp).map_err(io_err(&tmp))?;
        let written = write_snapshot(file, snapshot)
            .map_err(StoreError::from)
            .and_then(|()| fs::rename(&tmp, &path).map_err(io_err(&path)));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), error = %cleanup, "could not remove temp file");
            }
            return Err(e);
        }

        info!(label, path = %path.display(), bills = snapshot.bills.len(), "saved snapshot");
        Ok(())
    }

    fn list_labels(&self) -> Vec<String> {
        self.try_list().unwrap_or_else(|e| {
            warn!(dir = %self.dir.display(), error = %format!("{e:#}"), "could not list snapshots");
            vec![]
        })
    }
}

fn strip_extension(label: &str) -> &str {
    label.strip_suffix(".csv").unwrap_or(label)
}

/// Only `Budget_<Mon>_<Year>` labels are saved, so every save shows up in listings.
fn validate_label(label: &str) -> Result<(), StoreError> {
    if label != label.trim() || SnapshotLabel::parse(label).is_none() {
        return Err(StoreError::InvalidLabel(label.to_string()));
    }
    Ok(())
}
