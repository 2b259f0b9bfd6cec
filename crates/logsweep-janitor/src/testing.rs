//! In-memory filesystem for unit tests

use crate::RetentionConfig;
use logsweep_domain::{ArchiveStats, DirEntry, FileType, RetentionFs};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub(crate) fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Config with thresholds at the given second offsets from the epoch
pub(crate) fn config_at(paths: &[&str], archive_secs: u64, expiry_secs: u64) -> RetentionConfig {
    RetentionConfig {
        archive_threshold: at(archive_secs),
        expiry_threshold: at(expiry_secs),
        base_paths: paths.iter().map(PathBuf::from).collect(),
        archive_extension: "zip".to_string(),
        dry_run: false,
        resolved_at: at(1_000),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Dir(SystemTime),
    File(SystemTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fault {
    Modified,
    Compress,
    RemoveDir,
    RemoveFile,
}

// Mock filesystem for testing
pub(crate) struct MockFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    faults: RefCell<BTreeSet<(Fault, PathBuf)>>,
    now: SystemTime,
}

impl MockFs {
    pub(crate) fn new() -> Self {
        Self {
            nodes: RefCell::new(BTreeMap::new()),
            faults: RefCell::new(BTreeSet::new()),
            now: at(1_000),
        }
    }

    pub(crate) fn add_dir(&self, path: &str, modified: SystemTime) {
        self.nodes
            .borrow_mut()
            .insert(PathBuf::from(path), Node::Dir(modified));
    }

    pub(crate) fn add_dir_micros(&self, path: &str, base: SystemTime, micros: u64) {
        self.add_dir(path, base + Duration::from_micros(micros));
    }

    pub(crate) fn add_file(&self, path: &str, modified: SystemTime) {
        self.nodes
            .borrow_mut()
            .insert(PathBuf::from(path), Node::File(modified));
    }

    pub(crate) fn fail_modified(&self, path: &str) {
        self.fault(Fault::Modified, path);
    }

    pub(crate) fn fail_compress(&self, path: &str) {
        self.fault(Fault::Compress, path);
    }

    pub(crate) fn fail_remove_dir(&self, path: &str) {
        self.fault(Fault::RemoveDir, path);
    }

    pub(crate) fn fail_remove_file(&self, path: &str) {
        self.fault(Fault::RemoveFile, path);
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.nodes.borrow().contains_key(Path::new(path))
    }

    pub(crate) fn snapshot(&self) -> Vec<PathBuf> {
        self.nodes.borrow().keys().cloned().collect()
    }

    fn fault(&self, fault: Fault, path: &str) {
        self.faults.borrow_mut().insert((fault, PathBuf::from(path)));
    }

    fn faulted(&self, fault: Fault, path: &Path) -> bool {
        self.faults.borrow().contains(&(fault, path.to_path_buf()))
    }
}

impl RetentionFs for MockFs {
    type Error = String;

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, Self::Error> {
        if !self.is_dir(path) {
            return Err(format!("not a directory: {}", path.display()));
        }
        Ok(self
            .nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| {
                let file_type = match node {
                    Node::Dir(_) => FileType::Directory,
                    Node::File(_) => FileType::File,
                };
                DirEntry::new(p.clone(), file_type)
            })
            .collect())
    }

    fn modified(&self, path: &Path) -> Result<SystemTime, Self::Error> {
        if self.faulted(Fault::Modified, path) {
            return Err("permission denied".to_string());
        }
        match self.nodes.borrow().get(path) {
            Some(Node::Dir(t)) | Some(Node::File(t)) => Ok(*t),
            None => Err(format!("not found: {}", path.display())),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir(_)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn compress_dir(&self, source: &Path, destination: &Path) -> Result<ArchiveStats, Self::Error> {
        if self.faulted(Fault::Compress, source) {
            return Err("disk full".to_string());
        }
        if self.exists(destination) {
            return Err(format!("already exists: {}", destination.display()));
        }
        let files = self
            .nodes
            .borrow()
            .iter()
            .filter(|(p, node)| p.starts_with(source) && matches!(node, Node::File(_)))
            .count();
        self.nodes
            .borrow_mut()
            .insert(destination.to_path_buf(), Node::File(self.now));
        Ok(ArchiveStats {
            files,
            bytes: files as u64 * 10,
        })
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), Self::Error> {
        if self.faulted(Fault::RemoveDir, path) {
            return Err("device busy".to_string());
        }
        if !self.is_dir(path) {
            return Err(format!("not a directory: {}", path.display()));
        }
        self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), Self::Error> {
        if self.faulted(Fault::RemoveFile, path) {
            return Err("read-only filesystem".to_string());
        }
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            _ => Err(format!("not a file: {}", path.display())),
        }
    }
}
