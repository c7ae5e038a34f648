// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::{Path, PathBuf};

use contractmap_core::render::render_summary_line;
use contractmap_core::{
    discover_document, impact, load_document, project_root_of, render_impact_json,
    render_impact_text, render_json, render_text, verify, RealFs,
};
use tracing::info;

use crate::cli::FormatArg;

#[derive(Debug, Clone)]
pub(crate) struct VerifyOptions {
    pub file: Option<PathBuf>,
    pub impact: Option<String>,
    pub root: Option<PathBuf>,
    pub format: FormatArg,
    pub color: bool,
    pub quiet: bool,
}

/// An explicit file wins; a directory (or no argument) must hold exactly one contract map.
pub(crate) fn resolve_document_path(file: Option<&Path>) -> Result<PathBuf, String> {
    match file {
        Some(path) if path.is_dir() => discover_document(path).map_err(|err| err.to_string()),
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let cwd = env::current_dir()
                .map_err(|err| format!("cannot read working directory: {err}"))?;
            discover_document(&cwd).map_err(|err| err.to_string())
        }
    }
}

pub(crate) fn run_verify(options: &VerifyOptions) -> Result<(String, i32), String> {
    let path = resolve_document_path(options.file.as_deref())?;
    let document = load_document(&path).map_err(|err| err.to_string())?;

    if let Some(node_id) = options.impact.as_deref() {
        let outcome = impact(&document, node_id);
        let code = outcome.exit_code();
        let rendered = match options.format {
            FormatArg::Json => render_impact_json(&outcome)?,
            FormatArg::Text if options.quiet && code == 0 => String::new(),
            FormatArg::Text => render_impact_text(&outcome, options.color)
                .trim_end()
                .to_string(),
        };
        return Ok((rendered, code));
    }

    let root = options
        .root
        .clone()
        .unwrap_or_else(|| project_root_of(&path));
    info!(document = %path.display(), root = %root.display(), "verifying contract map");
    let report = verify(&RealFs, &document, &root);
    let rendered = match options.format {
        FormatArg::Json => render_json(&report)?,
        FormatArg::Text if options.quiet => render_summary_line(&report),
        FormatArg::Text => render_text(&report, options.color).trim_end().to_string(),
    };
    Ok((rendered, report.exit_code()))
}
