// SPDX-License-Identifier: Apache-2.0
//! Symbolic `loc` strings: `<path>` or `<path>:<line>`.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    pub path: &'a str,
    pub line: Option<usize>,
}

impl<'a> Location<'a> {
    /// A trailing all-digit `:` segment is a 1-based line number; line 0 means "no line".
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        if let Some((path, tail)) = raw.rsplit_once(':') {
            if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
                let line = tail.parse::<usize>().ok().filter(|line| *line > 0);
                return Self { path, line };
            }
        }
        Self {
            path: raw,
            line: None,
        }
    }

    pub fn resolve(&self, project_root: &Path, doc_root: &str) -> ResolvedLocation {
        let base = if doc_root.trim().is_empty() {
            project_root.to_path_buf()
        } else {
            project_root.join(doc_root.trim())
        };
        ResolvedLocation {
            path: base.join(self.path),
            line: self.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub line: Option<usize>,
}

pub fn resolve_location(raw: &str, project_root: &Path, doc_root: &str) -> ResolvedLocation {
    Location::parse(raw).resolve(project_root, doc_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_numeric_line_suffix() {
        let loc = Location::parse("src/repo.ts:42");
        assert_eq!(loc.path, "src/repo.ts");
        assert_eq!(loc.line, Some(42));
    }

    #[test]
    fn keeps_non_numeric_suffix_in_path() {
        let loc = Location::parse("C:file.ts");
        assert_eq!(loc.path, "C:file.ts");
        assert_eq!(loc.line, None);
        let loc = Location::parse("src/repo.ts:");
        assert_eq!(loc.path, "src/repo.ts:");
        assert_eq!(loc.line, None);
    }

    #[test]
    fn only_the_final_segment_is_a_line() {
        let loc = Location::parse("dir:1/file.ts:7");
        assert_eq!(loc.path, "dir:1/file.ts");
        assert_eq!(loc.line, Some(7));
    }

    #[test]
    fn line_zero_is_dropped() {
        assert_eq!(Location::parse("a.sql:0").line, None);
        assert_eq!(Location::parse("a.sql:0").path, "a.sql");
    }

    #[test]
    fn resolves_against_both_roots() {
        let resolved = resolve_location("db/schema.sql:3", Path::new("/repo"), "backend");
        assert_eq!(resolved.path, PathBuf::from("/repo/backend/db/schema.sql"));
        assert_eq!(resolved.line, Some(3));
        let resolved = resolve_location("db/schema.sql", Path::new("/repo"), "");
        assert_eq!(resolved.path, PathBuf::from("/repo/db/schema.sql"));
        assert_eq!(resolved.line, None);
    }

    proptest! {
        #[test]
        fn path_and_line_roundtrip(path in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.[a-z]{2,3}", line in 1usize..100_000) {
            let raw = format!("{path}:{line}");
            let loc = Location::parse(&raw);
            prop_assert_eq!(loc.path, path.as_str());
            prop_assert_eq!(loc.line, Some(line));
        }

        #[test]
        fn plain_paths_never_gain_a_line(path in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.[a-z]{2,3}") {
            let loc = Location::parse(&path);
            prop_assert_eq!(loc.path, path.as_str());
            prop_assert_eq!(loc.line, None);
        }
    }
}
