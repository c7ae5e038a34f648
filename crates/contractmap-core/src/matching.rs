// SPDX-License-Identifier: Apache-2.0
//! Best-effort textual evidence. None of this parses the target language.

use std::path::PathBuf;

use regex::{Regex, RegexBuilder};

pub const TYPE_WINDOW: usize = 5;
pub const METHOD_WINDOW: usize = 5;
pub const ENDPOINT_WINDOW: usize = 10;
pub const DEFAULT_WINDOW: usize = 15;

const QUOTE: &str = "[\"'`]";
const NOT_IDENT: &str = "[^A-Za-z0-9_$]";

/// A source file read for one check, with its declared line if any.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub display: String,
    pub line: Option<usize>,
    pub text: String,
}

impl SourceFile {
    /// Lines `[line - radius, line + radius]`, 1-based and clamped to the file.
    pub fn window(&self, radius: usize) -> Option<String> {
        let line = self.line?;
        let lines = self.text.lines().collect::<Vec<_>>();
        if lines.is_empty() {
            return Some(String::new());
        }
        let center = line.min(lines.len());
        let start = center.saturating_sub(radius).max(1);
        let end = (center + radius).min(lines.len());
        Some(lines[start - 1..end].join("\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    /// Found, and near the declared line when one was declared.
    Near,
    /// Found in the file but outside the declared window.
    Elsewhere,
    Absent,
}

pub fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(text))
}

pub fn locate(source: &SourceFile, patterns: &[Regex], radius: usize) -> Evidence {
    locate_with(source, radius, |text| any_match(patterns, text))
}

pub fn locate_with<F>(source: &SourceFile, radius: usize, found: F) -> Evidence
where
    F: Fn(&str) -> bool,
{
    if let Some(window) = source.window(radius) {
        if found(&window) {
            return Evidence::Near;
        }
        return if found(&source.text) {
            Evidence::Elsewhere
        } else {
            Evidence::Absent
        };
    }
    if found(&source.text) {
        Evidence::Near
    } else {
        Evidence::Absent
    }
}

fn compile(sources: Vec<String>, case_insensitive: bool) -> Result<Vec<Regex>, regex::Error> {
    sources
        .iter()
        .map(|source| {
            RegexBuilder::new(source)
                .multi_line(true)
                .case_insensitive(case_insensitive)
                .build()
        })
        .collect()
}

/// `name` delimited by non-identifier characters or line edges.
pub fn token_source(name: &str) -> String {
    format!(
        "(?:^|{NOT_IDENT}){}(?:{NOT_IDENT}|$)",
        regex::escape(name)
    )
}

pub fn quoted_source(name: &str) -> String {
    format!("{QUOTE}{}{QUOTE}", regex::escape(name))
}

pub fn type_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    let n = regex::escape(name);
    compile(
        vec![
            format!(
                r"\b(?:type|interface|enum|struct|class|trait|record|typedef|protocol|union|object)\s+{n}(?:{NOT_IDENT}|$)"
            ),
            format!(r"\b(?:const|let|var|val|final)\s+{n}[A-Za-z0-9_$]*\s*(?::[^=\n]+)?="),
            format!(r"^[ \t]*{n}[A-Za-z0-9_]*\s*=[^=]"),
        ],
        false,
    )
}

pub fn method_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    let n = regex::escape(name);
    let generics = r"(?:<[^>\n]*>)?";
    compile(
        vec![
            format!(
                r"\b(?:public|private|protected|internal|pub(?:\([a-z]+\))?)\s+(?:[^\n;=(){{}}]*?\s)?{n}\s*{generics}\s*\("
            ),
            format!(r"\b(?:fn|def|func|function|fun|sub|method)\s+{n}\s*{generics}\s*\("),
            format!(r"\bfunc\s*\([^)\n]*\)\s*{n}\s*\("),
            format!(
                r"^[ \t]*(?:(?:static|async|override|get|set|abstract|virtual|final|synchronized)\s+)*{n}\s*{generics}\s*\([^)]*\)\s*(?:(?::[^{{\n;]*)?\{{|=>|:[^{{\n;]+;)"
            ),
            format!(
                r"(?:^|{NOT_IDENT}){n}\s*[:=]\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=\n]+)?=>|[A-Za-z0-9_$]+\s*=>)"
            ),
        ],
        false,
    )
}

pub fn table_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    let n = regex::escape(name);
    compile(
        vec![format!(
            r#"\bcreate\s+table\s+(?:if\s+not\s+exists\s+)?[`"\[]?{n}[`"\]]?(?:[^A-Za-z0-9_]|$)"#
        )],
        true,
    )
}

/// Evidence that `table` is referenced at all, used for fk targets.
pub fn table_reference_patterns(table: &str) -> Result<Vec<Regex>, regex::Error> {
    compile(vec![token_source(table)], true)
}

pub fn endpoint_patterns(method: &str, path: &str) -> Result<Vec<Regex>, regex::Error> {
    let m = regex::escape(method);
    let p = regex::escape(path);
    compile(
        vec![
            format!(r"\.(?i:{m})\s*\(\s*{QUOTE}{p}{QUOTE}"),
            format!(
                r"@(?i:{m})(?:Mapping)?\s*\(\s*(?:(?:value|path)\s*=\s*)?{QUOTE}{p}{QUOTE}"
            ),
            format!(r"\b(?i:{m})\b[^\n]*?{QUOTE}{p}{QUOTE}"),
            format!(r"{QUOTE}{p}{QUOTE}[^\n]*?\b(?i:{m})\b"),
        ],
        false,
    )
}

pub fn event_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    compile(vec![quoted_source(name), token_source(name)], false)
}

pub fn quoted_literal_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    compile(vec![quoted_source(name)], false)
}

pub fn call_patterns(name: &str) -> Result<Vec<Regex>, regex::Error> {
    compile(
        vec![format!(r"(?:^|{NOT_IDENT}){}\s*\(", regex::escape(name))],
        false,
    )
}

pub fn validation_call_patterns(schema: &str) -> Result<Vec<Regex>, regex::Error> {
    let s = regex::escape(schema);
    compile(
        vec![
            format!(
                r"(?:^|{NOT_IDENT}){s}\s*\.\s*(?:parse|safeParse|parseAsync|safeParseAsync|validate|validateSync|validateAsync|check|assert|decode|is)\s*\("
            ),
            format!(
                r"\b(?:validate|parse|check|assert)[A-Za-z0-9_]*\s*\(\s*{s}(?:{NOT_IDENT}|$)"
            ),
        ],
        false,
    )
}

pub fn table_access_patterns(table: &str) -> Result<Vec<Regex>, regex::Error> {
    let t = regex::escape(table);
    let mut patterns = compile(
        vec![format!(
            r#"\b(?:insert\s+(?:or\s+[a-z]+\s+)?into|update|delete\s+from|replace\s+into|merge\s+into|upsert\s+into|from|join|into)\s+[`"\[]?{t}[`"\]]?(?:[^A-Za-z0-9_]|$)"#
        )],
        true,
    )?;
    patterns.extend(compile(
        vec![format!(
            r#"["'`](?:[^"'`\n]*[^A-Za-z0-9_"'`\n])?{t}(?:[^A-Za-z0-9_"'`\n][^"'`\n]*)?["'`]"#
        )],
        false,
    )?);
    Ok(patterns)
}

/// Referenced table in an fk entry: `col -> table(.col)`, `table.col`, or `table`.
pub fn fk_target(entry: &str) -> &str {
    let target = entry
        .rsplit_once("->")
        .map(|(_, rhs)| rhs)
        .unwrap_or(entry)
        .trim();
    let end = target.find(['.', '(', ' ']).unwrap_or(target.len());
    target[..end].trim()
}
