// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    Io {
        op: &'static str,
        path: PathBuf,
        detail: String,
    },
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, detail } => {
                write!(f, "io error: {op} {} ({detail})", path.display())
            }
        }
    }
}

impl std::error::Error for AdapterError {}

/// Read-only view of the project tree. Every read is independent; nothing is cached.
pub trait Fs {
    fn read_text(&self, path: &Path) -> Result<String, AdapterError>;

    fn is_readable(&self, path: &Path) -> bool {
        self.read_text(path).is_ok()
    }
}
