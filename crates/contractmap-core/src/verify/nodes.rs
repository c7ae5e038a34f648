// SPDX-License-Identifier: Apache-2.0

use contractmap_model::{CheckRecord, CheckStatus, EndpointRoute, NodeId, NodeKind, NodeRecord, Phase};
use regex::Regex;

use super::{log_record, SourceError, VerifyContext};
use crate::matching::{
    self, endpoint_patterns, event_patterns, fk_target, locate, locate_with, method_patterns,
    table_patterns, table_reference_patterns, type_patterns, Evidence, SourceFile,
    DEFAULT_WINDOW, ENDPOINT_WINDOW, METHOD_WINDOW, TYPE_WINDOW,
};

pub fn verify_nodes(ctx: &VerifyContext<'_>) -> Vec<CheckRecord> {
    let mut out = Vec::new();
    for (id, node) in &ctx.document.nodes {
        let start = out.len();
        let kind = ctx.document.node_kind(id);
        verify_node(ctx, id, node, &kind, &mut out);
        out[start..].iter().for_each(log_record);
    }
    out
}

fn record(id: &str, check: &str, status: CheckStatus, message: String) -> CheckRecord {
    CheckRecord::new(Phase::Nodes, id, check, status, message)
}

fn verify_node(
    ctx: &VerifyContext<'_>,
    id: &str,
    node: &NodeRecord,
    kind: &NodeKind,
    out: &mut Vec<CheckRecord>,
) {
    if let NodeKind::Custom(custom) = kind {
        out.push(custom_existence(ctx, id, custom));
        return;
    }

    let source = match ctx.read_node_source(id) {
        Ok(source) => source,
        Err(SourceError::NoLocation) => {
            out.push(record(id, "exists", CheckStatus::Fail, "no loc declared".to_string()));
            return;
        }
        Err(SourceError::Unreadable { display }) => {
            out.push(
                record(
                    id,
                    "exists",
                    CheckStatus::Fail,
                    format!("file not found: {display}"),
                )
                .at(display, None),
            );
            return;
        }
    };

    let name = NodeId::parse(id).identifier.trim();
    if name.is_empty() {
        out.push(
            record(
                id,
                "exists",
                CheckStatus::Fail,
                "node id has no identifier after the kind prefix".to_string(),
            )
            .at(source.display.clone(), source.line),
        );
        return;
    }

    match kind {
        NodeKind::Type => {
            out.push(existence(
                id,
                &source,
                type_patterns(name),
                TYPE_WINDOW,
                &format!("type `{name}`"),
            ));
            check_values(id, node, &source, out);
            check_schema(id, node, &source, out);
        }
        NodeKind::Method => {
            let method = NodeId::parse(id).method_name();
            out.push(existence(
                id,
                &source,
                method_patterns(method),
                METHOD_WINDOW,
                &format!("method `{method}`"),
            ));
        }
        NodeKind::Table => {
            out.push(existence(
                id,
                &source,
                table_patterns(name),
                DEFAULT_WINDOW,
                &format!("CREATE TABLE `{name}`"),
            ));
            check_foreign_keys(id, node, &source, out);
        }
        NodeKind::Endpoint => out.push(endpoint_existence(id, name, &source)),
        NodeKind::Event => {
            out.push(existence(
                id,
                &source,
                event_patterns(name),
                DEFAULT_WINDOW,
                &format!("event `{name}`"),
            ));
        }
        // Checked before any read.
        NodeKind::Custom(_) => {}
    }
}

/// Custom kinds only need the file to be there; the bytes are never decoded.
fn custom_existence(ctx: &VerifyContext<'_>, id: &str, custom: &str) -> CheckRecord {
    let Some(resolved) = ctx.node_location(id) else {
        return record(id, "exists", CheckStatus::Fail, "no loc declared".to_string());
    };
    let shown = ctx.display_path(&resolved.path);
    if ctx.fs.is_readable(&resolved.path) {
        record(
            id,
            "exists",
            CheckStatus::Pass,
            format!("file exists (custom kind `{custom}`, content not inspected)"),
        )
        .at(shown, resolved.line)
    } else {
        record(
            id,
            "exists",
            CheckStatus::Fail,
            format!("file not found: {shown}"),
        )
        .at(shown, None)
    }
}

fn existence(
    id: &str,
    source: &SourceFile,
    patterns: Result<Vec<Regex>, regex::Error>,
    radius: usize,
    what: &str,
) -> CheckRecord {
    match patterns {
        Ok(patterns) => evidence_record(id, source, locate(source, &patterns, radius), what),
        Err(err) => record(
            id,
            "exists",
            CheckStatus::Fail,
            format!("invalid pattern for {what}: {err}"),
        )
        .at(source.display.clone(), source.line),
    }
}

fn evidence_record(id: &str, source: &SourceFile, evidence: Evidence, what: &str) -> CheckRecord {
    let (status, message) = match (evidence, source.line) {
        (Evidence::Near, Some(line)) => (CheckStatus::Pass, format!("{what} found near line {line}")),
        (Evidence::Near, None) => (CheckStatus::Pass, format!("{what} found")),
        (Evidence::Elsewhere, line) => (
            CheckStatus::Warn,
            format!(
                "{what} found but not near declared line {}",
                line.unwrap_or_default()
            ),
        ),
        (Evidence::Absent, _) => (
            CheckStatus::Fail,
            format!("{what} not found in {}", source.display),
        ),
    };
    record(id, "exists", status, message).at(source.display.clone(), source.line)
}

fn endpoint_existence(id: &str, identifier: &str, source: &SourceFile) -> CheckRecord {
    let route = EndpointRoute::parse(identifier);
    if route.path.is_empty() {
        return record(
            id,
            "exists",
            CheckStatus::Fail,
            "endpoint id declares no path".to_string(),
        )
        .at(source.display.clone(), source.line);
    }
    match route.method {
        None => {
            let evidence = locate_with(source, ENDPOINT_WINDOW, |text| text.contains(route.path));
            evidence_record(id, source, evidence, &format!("route `{}`", route.path))
        }
        Some(method) => existence(
            id,
            source,
            endpoint_patterns(method, route.path),
            ENDPOINT_WINDOW,
            &format!("route `{} {}`", method.to_ascii_uppercase(), route.path),
        ),
    }
}

fn check_values(id: &str, node: &NodeRecord, source: &SourceFile, out: &mut Vec<CheckRecord>) {
    if node.values.is_empty() {
        return;
    }
    let missing = node
        .values
        .iter()
        .filter(|value| !source.text.contains(value.as_str()))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        out.push(
            record(
                id,
                "values",
                CheckStatus::Pass,
                format!("all {} declared values present", node.values.len()),
            )
            .at(source.display.clone(), None),
        );
        return;
    }
    for value in missing {
        out.push(
            record(
                id,
                "values",
                CheckStatus::Fail,
                format!("declared value `{value}` not found"),
            )
            .at(source.display.clone(), None),
        );
    }
}

fn check_schema(id: &str, node: &NodeRecord, source: &SourceFile, out: &mut Vec<CheckRecord>) {
    let Some(schema) = node.schema.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    let present = Regex::new(&matching::token_source(schema))
        .map(|pattern| {
            source
                .text
                .lines()
                .any(|line| pattern.is_match(line))
        })
        .unwrap_or(false);
    let (status, message) = if present {
        (CheckStatus::Pass, format!("schema `{schema}` present"))
    } else {
        (CheckStatus::Fail, format!("schema `{schema}` not found"))
    };
    out.push(record(id, "schema", status, message).at(source.display.clone(), None));
}

/// fk references are soft: a missing referenced table only warns.
fn check_foreign_keys(
    id: &str,
    node: &NodeRecord,
    source: &SourceFile,
    out: &mut Vec<CheckRecord>,
) {
    for entry in &node.fk {
        let target = fk_target(entry);
        let row = if target.is_empty() {
            record(
                id,
                "fk",
                CheckStatus::Warn,
                format!("fk entry `{entry}` names no table"),
            )
        } else {
            let found = table_reference_patterns(target)
                .map(|patterns| matching::any_match(&patterns, &source.text))
                .unwrap_or(false);
            if found {
                record(
                    id,
                    "fk",
                    CheckStatus::Pass,
                    format!("fk target `{target}` referenced"),
                )
            } else {
                record(
                    id,
                    "fk",
                    CheckStatus::Warn,
                    format!("fk target `{target}` not referenced in {}", source.display),
                )
            }
        };
        out.push(row.at(source.display.clone(), None));
    }
}
