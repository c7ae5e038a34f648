// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use contractmap_model::Document;
use tracing::{debug, info};

pub const DOCUMENT_BASENAME: &str = "contractmap";
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Read { path: PathBuf, detail: String },
    Parse { path: PathBuf, detail: String },
    NotFound { dir: PathBuf },
    Ambiguous { dir: PathBuf, candidates: Vec<PathBuf> },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, detail } => {
                write!(f, "failed to read {}: {detail}", path.display())
            }
            Self::Parse { path, detail } => {
                write!(f, "failed to parse {}: {detail}", path.display())
            }
            Self::NotFound { dir } => write!(
                f,
                "no contract map found in {} (expected contractmap.yaml or *.contractmap.yaml)",
                dir.display()
            ),
            Self::Ambiguous { dir, candidates } => {
                let names = candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "multiple contract maps found in {}; pass one explicitly: {names}",
                    dir.display()
                )
            }
        }
    }
}

impl std::error::Error for LoadError {}

pub fn parse_document(text: &str, path: &Path) -> Result<Document, LoadError> {
    serde_yaml::from_str(text).map_err(|err| LoadError::Parse {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}

pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let text = fs::read_to_string(path).map_err(|err| LoadError::Read {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    let document = parse_document(&text, path)?;
    info!(
        path = %path.display(),
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        flows = document.flows.len(),
        invariants = document.invariants.len(),
        "loaded contract map"
    );
    Ok(document)
}

pub fn is_document_file_name(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    if !DOCUMENT_EXTENSIONS.contains(&ext) {
        return false;
    }
    stem == DOCUMENT_BASENAME
        || stem
            .strip_suffix(DOCUMENT_BASENAME)
            .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
}

/// Directory `loc` paths resolve against when no override is given.
pub fn project_root_of(document_path: &Path) -> PathBuf {
    match document_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Exactly one contract map must sit directly in `dir`.
pub fn discover_document(dir: &Path) -> Result<PathBuf, LoadError> {
    let entries = fs::read_dir(dir).map_err(|err| LoadError::Read {
        path: dir.to_path_buf(),
        detail: err.to_string(),
    })?;
    let mut candidates = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_document_file_name)
        })
        .collect::<Vec<_>>();
    candidates.sort();
    debug!(dir = %dir.display(), candidates = candidates.len(), "contract map discovery");
    match candidates.len() {
        0 => Err(LoadError::NotFound {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(LoadError::Ambiguous {
            dir: dir.to_path_buf(),
            candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognizes_document_names() {
        assert!(is_document_file_name("contractmap.yaml"));
        assert!(is_document_file_name("contractmap.json"));
        assert!(is_document_file_name("billing.contractmap.yml"));
        assert!(!is_document_file_name("contractmap.toml"));
        assert!(!is_document_file_name("mycontractmap.yaml"));
        assert!(!is_document_file_name(".contractmap.yaml"));
        assert!(!is_document_file_name("README.md"));
    }

    #[test]
    fn discovery_requires_exactly_one_candidate() {
        let tmp = TempDir::new().expect("tempdir");
        let err = discover_document(tmp.path()).expect_err("none");
        assert!(matches!(err, LoadError::NotFound { .. }));

        fs::write(tmp.path().join("contractmap.yaml"), "nodes: {}").expect("write");
        fs::write(tmp.path().join("notes.md"), "x").expect("write");
        let found = discover_document(tmp.path()).expect("one");
        assert_eq!(found, tmp.path().join("contractmap.yaml"));

        fs::write(tmp.path().join("api.contractmap.json"), "{}").expect("write");
        match discover_document(tmp.path()).expect_err("two") {
            LoadError::Ambiguous { candidates, .. } => {
                assert_eq!(
                    candidates,
                    vec![
                        tmp.path().join("api.contractmap.json"),
                        tmp.path().join("contractmap.yaml"),
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn json_and_yaml_documents_decode_alike() {
        let tmp = TempDir::new().expect("tempdir");
        let json_path = tmp.path().join("contractmap.json");
        fs::write(
            &json_path,
            r#"{"version":"1","meta":{"name":"demo","root":"app"},"nodes":{"table:t":{"loc":"db.sql"}},"edges":[]}"#,
        )
        .expect("write");
        let doc = load_document(&json_path).expect("load");
        assert_eq!(doc.meta.root, "app");
        assert!(doc.contains_node("table:t"));
    }

    #[test]
    fn project_root_is_the_document_directory() {
        assert_eq!(
            project_root_of(Path::new("/repo/maps/contractmap.yaml")),
            PathBuf::from("/repo/maps")
        );
        assert_eq!(project_root_of(Path::new("contractmap.yaml")), PathBuf::from("."));
    }

    #[test]
    fn unreadable_and_malformed_documents_are_errors() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = load_document(&tmp.path().join("contractmap.yaml")).expect_err("missing");
        assert!(matches!(missing, LoadError::Read { .. }));

        let bad = tmp.path().join("contractmap.yaml");
        fs::write(&bad, "edges: {not: [a list").expect("write");
        let err = load_document(&bad).expect_err("malformed");
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
