//! Collaborator interfaces wired by the bootstrap.
//!
//! The container only needs the shapes of these services — how a tree is
//! scanned, where the roots come from, how a plan is computed. The real
//! comparison engine, the settings file format and the UI all live behind
//! these traits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arkiv_container::{ContainerError, Locator};

/// One file inside a scanned tree, keyed by its path relative to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub relative: PathBuf,
    pub len: u64,
}

/// Lists the files under a reconciliation root.
pub trait TreeScanner: Send + Sync {
    fn scan(&self, root: &Path) -> io::Result<Vec<FileEntry>>;
}

/// Scanner over the local filesystem; walks the whole tree.
pub struct LocalTreeScanner;

impl LocalTreeScanner {
    fn walk(&self, base: &Path, dir: &Path, out: &mut Vec<FileEntry>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let meta = entry.metadata()?;
            if meta.is_dir() {
                self.walk(base, &path, out)?;
            } else {
                out.push(FileEntry {
                    relative: path.strip_prefix(base).unwrap_or(&path).to_path_buf(),
                    len: meta.len(),
                });
            }
        }
        Ok(())
    }
}

impl TreeScanner for LocalTreeScanner {
    fn scan(&self, root: &Path) -> io::Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        self.walk(root, root, &mut entries)?;
        Ok(entries)
    }
}

/// The two roots being reconciled.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_root: PathBuf,
    pub mirror_root: PathBuf,
}

/// Hands out the persisted settings.
///
/// Reading and writing the settings file is the configuration layer's
/// business; the container only constructs the store and passes it around.
pub trait SettingsStore: Send + Sync {
    fn current(&self) -> Settings;
}

/// Store with fixed, in-memory settings — what the bootstrap and the tests
/// wire when no settings file is in play.
pub struct FixedSettings {
    settings: Settings,
}

impl FixedSettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for FixedSettings {
    fn current(&self) -> Settings {
        self.settings.clone()
    }
}

/// A pending copy or delete produced by comparing the two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    CopyToMirror(PathBuf),
    DeleteFromMirror(PathBuf),
}

/// Compares the two scanned trees and proposes actions.
pub trait Reconciler: Send + Sync {
    fn plan(&self, source: &[FileEntry], mirror: &[FileEntry]) -> Vec<PlannedAction>;
}

/// Path-and-size comparison. Content inspection belongs to the full
/// comparison engine, not this layer.
pub struct BasicReconciler;

impl Reconciler for BasicReconciler {
    fn plan(&self, source: &[FileEntry], mirror: &[FileEntry]) -> Vec<PlannedAction> {
        use std::collections::BTreeMap;

        let source_files: BTreeMap<&Path, u64> = source
            .iter()
            .map(|entry| (entry.relative.as_path(), entry.len))
            .collect();
        let mirror_files: BTreeMap<&Path, u64> = mirror
            .iter()
            .map(|entry| (entry.relative.as_path(), entry.len))
            .collect();

        let mut actions = Vec::new();
        for (path, len) in &source_files {
            match mirror_files.get(path) {
                Some(mirror_len) if mirror_len == len => {}
                _ => actions.push(PlannedAction::CopyToMirror(path.to_path_buf())),
            }
        }
        for path in mirror_files.keys() {
            if !source_files.contains_key(path) {
                actions.push(PlannedAction::DeleteFromMirror(path.to_path_buf()));
            }
        }
        actions
    }
}

/// Failure surfaced by [`MainModel::refresh`].
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Wiring(#[from] ContainerError),

    #[error("failed to scan tree: {0}")]
    Scan(#[from] io::Error),
}

/// Presents one directory tree.
///
/// Constructed fresh for every refresh, so a pane never shows a stale
/// listing; registered under the "source" and "mirror" scope keys.
pub struct PaneModel {
    scanner: Arc<dyn TreeScanner>,
    root: PathBuf,
}

impl PaneModel {
    pub fn new(scanner: Arc<dyn TreeScanner>, root: PathBuf) -> Self {
        Self { scanner, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> io::Result<Vec<FileEntry>> {
        self.scanner.scan(&self.root)
    }
}

/// Root presentation model — the entry object the bootstrap resolves
/// eagerly. Holds the injected [`Locator`] so it can build panes on demand
/// without ever touching registration.
pub struct MainModel {
    locator: Locator,
    reconciler: Arc<dyn Reconciler>,
}

impl MainModel {
    pub fn new(locator: Locator, reconciler: Arc<dyn Reconciler>) -> Self {
        Self { locator, reconciler }
    }

    /// Builds a fresh pane per root and returns the proposed actions.
    pub fn refresh(&self) -> Result<Vec<PlannedAction>, RefreshError> {
        let source: Arc<PaneModel> = self.locator.create_in("source")?;
        let mirror: Arc<PaneModel> = self.locator.create_in("mirror")?;
        Ok(self.reconciler.plan(&source.entries()?, &mirror.entries()?))
    }
}
