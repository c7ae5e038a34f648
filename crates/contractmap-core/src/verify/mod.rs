// SPDX-License-Identifier: Apache-2.0
//! The four verification phases.
//!
//! Each phase walks its part of the document in document order and appends
//! PASS/FAIL/WARN records; nothing aborts on a single failure.

mod edges;
mod flows;
mod invariants;
mod nodes;

use std::path::{Path, PathBuf};

use contractmap_model::{CheckRecord, Document, Phase, VerifyReport};
use tracing::{debug, info, warn};

use crate::adapters::normalize_line_endings;
use crate::location::{resolve_location, ResolvedLocation};
use crate::matching::SourceFile;
use crate::ports::Fs;

pub use edges::verify_edges;
pub use flows::verify_flows;
pub use invariants::verify_invariants;
pub use nodes::verify_nodes;

/// Everything a phase needs: the file port, the document, and the project root.
pub struct VerifyContext<'a> {
    pub fs: &'a dyn Fs,
    pub document: &'a Document,
    pub project_root: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SourceError {
    NoLocation,
    Unreadable { display: String },
}

impl<'a> VerifyContext<'a> {
    pub fn new(fs: &'a dyn Fs, document: &'a Document, project_root: &'a Path) -> Self {
        Self {
            fs,
            document,
            project_root,
        }
    }

    pub fn resolve(&self, loc: &str) -> ResolvedLocation {
        resolve_location(loc, self.project_root, &self.document.meta.root)
    }

    /// Path as printed in records: relative to the project root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    pub(crate) fn node_location(&self, id: &str) -> Option<ResolvedLocation> {
        let loc = self.document.node(id)?.loc.as_deref()?;
        Some(self.resolve(loc))
    }

    pub(crate) fn node_path(&self, id: &str) -> Option<PathBuf> {
        self.node_location(id).map(|resolved| resolved.path)
    }

    pub(crate) fn read_node_source(&self, id: &str) -> Result<SourceFile, SourceError> {
        let loc = self
            .document
            .node(id)
            .and_then(|node| node.loc.as_deref())
            .ok_or(SourceError::NoLocation)?;
        self.read_source(loc)
    }

    pub(crate) fn read_source(&self, loc: &str) -> Result<SourceFile, SourceError> {
        let resolved = self.resolve(loc);
        let shown = self.display_path(&resolved.path);
        match self.fs.read_text(&resolved.path) {
            Ok(text) => Ok(SourceFile {
                path: resolved.path,
                display: shown,
                line: resolved.line,
                text: normalize_line_endings(&text),
            }),
            Err(err) => {
                warn!(path = %shown, error = %err, "source file unreadable");
                Err(SourceError::Unreadable { display: shown })
            }
        }
    }
}

pub(crate) fn log_record(record: &CheckRecord) {
    debug!(
        phase = %record.phase,
        subject = %record.subject,
        check = %record.check,
        status = %record.status,
        "{}",
        record.message
    );
}

/// Runs all four phases in order and aggregates their records.
pub fn verify(fs: &dyn Fs, document: &Document, project_root: &Path) -> VerifyReport {
    let ctx = VerifyContext::new(fs, document, project_root);
    let mut records = Vec::new();
    for phase in Phase::ALL {
        let rows = match phase {
            Phase::Nodes => verify_nodes(&ctx),
            Phase::Edges => verify_edges(&ctx),
            Phase::Flows => verify_flows(&ctx),
            Phase::Invariants => verify_invariants(&ctx),
        };
        info!(phase = %phase, records = rows.len(), "phase complete");
        records.extend(rows);
    }
    let report = VerifyReport::new(document.meta.name.clone(), document.version.clone(), records);
    info!(
        pass = report.summary.pass,
        fail = report.summary.fail,
        warn = report.summary.warn,
        "verification complete"
    );
    report
}
