// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use crate::ports::{AdapterError, Fs};

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl Fs for RealFs {
    /// Invalid UTF-8 is replaced rather than rejected, so any file that opens is readable.
    fn read_text(&self, path: &Path) -> Result<String, AdapterError> {
        fs::read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|err| AdapterError::Io {
                op: "read",
                path: path.to_path_buf(),
                detail: err.to_string(),
            })
    }

    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && fs::File::open(path).is_ok()
    }
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
