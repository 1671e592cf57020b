//! Platform launchers and what they hand back.
//!
//! A [`PictureLauncher`] presents the platform picker or camera. It is fired
//! as the side effect of a successful request start and reports later, through
//! [`PictureChooser::handle_platform_result`](crate::chooser::PictureChooser::handle_platform_result),
//! with a [`PlatformResult`].
//!
//! [`FileLauncher`] is the desktop implementation: the "selection" is a list
//! of paths given up front, with directories expanded to the image files
//! they contain.

use crate::naming;
use crate::request::PickKind;
use log::{trace, warn};
use std::borrow::Cow;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("{0} is not supported by this launcher")]
    Unsupported(PickKind),
    #[error("platform error: {0}")]
    Platform(String),
}

/// Where the bytes of a selected item live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemData {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// An opaque handle to one item chosen on the platform side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    /// Path or URI as reported by the platform; the display name comes from here.
    pub location: String,
    pub data: ItemData,
}

impl SelectedItem {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.to_string_lossy().into_owned(),
            data: ItemData::File(path),
        }
    }

    pub fn from_bytes(location: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            location: location.into(),
            data: ItemData::Memory(data),
        }
    }

    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.data {
            ItemData::File(path) => std::fs::read(path).map(Cow::Owned),
            ItemData::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    pub fn display_name(&self) -> String {
        naming::display_name(&self.location)
    }
}

/// Raw result of a launch, before any image processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformResult {
    Selected(Vec<SelectedItem>),
    Cancelled,
    Failed(String),
}

pub trait PictureLauncher {
    /// Present the picker or camera for `kind`. Must not block on the user.
    fn launch(&self, kind: PickKind) -> Result<(), LaunchError>;
}

/// Launcher over a fixed list of paths.
///
/// Supports picking; there is no camera on this platform, so
/// [`PickKind::Capture`] is rejected.
pub struct FileLauncher {
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
    launched: Cell<Option<PickKind>>,
}

impl FileLauncher {
    /// `extensions` filters files found inside directories (case-insensitive).
    /// Files named directly are always offered.
    pub fn new(paths: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            paths,
            extensions,
            launched: Cell::new(None),
        }
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }

    /// Expand directories (sorted by file name) and drop paths that do not exist.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for path in &self.paths {
            if path.is_dir() {
                for entry in WalkDir::new(path).sort_by_file_name() {
                    match entry {
                        Ok(entry)
                            if entry.file_type().is_file()
                                && self.has_allowed_extension(entry.path()) =>
                        {
                            found.push(entry.into_path())
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Skipping unreadable entry under {}: {e}", path.display()),
                    }
                }
            } else if path.is_file() {
                found.push(path.clone());
            } else {
                warn!("Skipping missing path {}", path.display());
            }
        }
        found
    }

    /// Collect what the last launch "selected".
    ///
    /// A single pick or capture offers only the first candidate. Calling this
    /// without a launch reports a platform failure.
    pub fn take_result(&self) -> PlatformResult {
        let Some(kind) = self.launched.take() else {
            return PlatformResult::Failed("picker was not launched".into());
        };
        let mut candidates = self.candidates();
        if !kind.allows_multiple() {
            candidates.truncate(1);
        }
        if candidates.is_empty() {
            trace!("Nothing to select for {kind}");
            return PlatformResult::Cancelled;
        }
        PlatformResult::Selected(candidates.into_iter().map(SelectedItem::from_path).collect())
    }
}

impl PictureLauncher for FileLauncher {
    fn launch(&self, kind: PickKind) -> Result<(), LaunchError> {
        if kind == PickKind::Capture {
            return Err(LaunchError::Unsupported(kind));
        }
        trace!("File launcher opened for {kind}");
        self.launched.set(Some(kind));
        Ok(())
    }
}
