//! Environment probes for conventionally installed vendor libraries

use std::path::{Path, PathBuf};

/// Relative location of the Propel ORM library under the kernel root.
pub const PROPEL_VENDOR_DIR: &str = "../vendor/palepurple/propel1";

/// Relative location of the Phing build tool classes under the kernel root.
pub const PHING_VENDOR_DIR: &str = "../vendor/phing/phing/classes";

/// Answers whether a candidate vendor path exists.
///
/// Kept as a predicate so normalization can be exercised without a filesystem.
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

impl<F> PathProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Conventional install locations, resolved against the kernel root directory.
///
/// Also carries the kernel debug flag, which is the default for `logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorLayout {
    root_dir: PathBuf,
    debug: bool,
}

impl VendorLayout {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn propel_path(&self) -> PathBuf {
        self.root_dir.join(PROPEL_VENDOR_DIR)
    }

    pub fn phing_path(&self) -> PathBuf {
        self.root_dir.join(PHING_VENDOR_DIR)
    }
}
