// SPDX-License-Identifier: Apache-2.0
//! Text and JSON views over reports. Nothing here touches the filesystem.

use contractmap_model::{
    CheckRecord, ImpactEdge, ImpactOutcome, ImpactReport, Phase, VerifyReport,
};

pub const REPORT_SCHEMA_VERSION: u64 = 1;

const CO_CHANGE_PLAIN: &str = "[co_change]";
const CO_CHANGE_COLORED: &str = "\u{1b}[1;35m[co_change]\u{1b}[0m";

fn record_line(record: &CheckRecord, color: bool) -> String {
    let status = if color {
        record.status.as_colored()
    } else {
        record.status.as_str()
    };
    let mut line = format!(
        "  {status} {} [{}] {}",
        record.subject, record.check, record.message
    );
    if let Some(location) = record.location() {
        line.push_str(&format!(" ({location})"));
    }
    line
}

pub fn render_text(report: &VerifyReport, color: bool) -> String {
    let mut out = String::new();
    let name = if report.name.trim().is_empty() {
        "(unnamed)"
    } else {
        report.name.as_str()
    };
    out.push_str(&format!(
        "Contract map: {name} (version {})\n",
        report.version
    ));
    for phase in Phase::ALL {
        let rows = report.phase_records(phase).collect::<Vec<_>>();
        out.push_str(&format!("{}:\n", phase.title()));
        if rows.is_empty() {
            out.push_str("  (nothing declared)\n");
        }
        for row in rows {
            out.push_str(&record_line(row, color));
            out.push('\n');
        }
    }
    out.push_str(&render_summary_line(report));
    out.push('\n');
    out
}

pub fn render_summary_line(report: &VerifyReport) -> String {
    format!(
        "Summary: {} checks: {} pass, {} fail, {} warn",
        report.summary.total, report.summary.pass, report.summary.fail, report.summary.warn
    )
}

pub fn report_json(report: &VerifyReport) -> serde_json::Value {
    serde_json::json!({
        "schema_version": REPORT_SCHEMA_VERSION,
        "name": report.name,
        "version": report.version,
        "summary": report.summary,
        "exit_code": report.exit_code(),
        "records": report.records,
    })
}

pub fn render_json(report: &VerifyReport) -> Result<String, String> {
    serde_json::to_string_pretty(&report_json(report)).map_err(|err| err.to_string())
}

fn edge_line(edge: &ImpactEdge, color: bool) -> String {
    let mut line = format!("  {} --{}--> {}", edge.from, edge.rel, edge.to);
    if edge.co_change {
        line.push(' ');
        line.push_str(if color { CO_CHANGE_COLORED } else { CO_CHANGE_PLAIN });
    }
    if let Some(note) = edge.note.as_deref().filter(|note| !note.trim().is_empty()) {
        line.push_str(&format!(" ({})", note.trim()));
    }
    line
}

fn render_found(report: &ImpactReport, color: bool) -> String {
    let mut out = String::new();
    match report.loc.as_deref() {
        Some(loc) => out.push_str(&format!("Impact: {} ({}, {loc})\n", report.node_id, report.kind)),
        None => out.push_str(&format!("Impact: {} ({})\n", report.node_id, report.kind)),
    }
    for (title, edges) in [
        ("Outgoing edges", &report.outgoing),
        ("Incoming edges", &report.incoming),
    ] {
        out.push_str(&format!("{title}: {}\n", edges.len()));
        for edge in edges {
            out.push_str(&edge_line(edge, color));
            out.push('\n');
        }
    }
    out.push_str(&format!("Flows: {}\n", report.flows.len()));
    for flow in &report.flows {
        let roles = flow
            .roles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if flow.trigger.trim().is_empty() {
            out.push_str(&format!("  {}: {roles}\n", flow.name));
        } else {
            out.push_str(&format!("  {} [{}]: {roles}\n", flow.name, flow.trigger.trim()));
        }
    }
    out.push_str(&format!("Invariants: {}\n", report.invariants.len()));
    for invariant in &report.invariants {
        match invariant.enforce.as_deref() {
            Some(enforce) => out.push_str(&format!(
                "  {}: {} (enforce: {enforce})\n",
                invariant.id, invariant.rule
            )),
            None => out.push_str(&format!("  {}: {}\n", invariant.id, invariant.rule)),
        }
    }
    if report.is_isolated() {
        out.push_str("Note: no edges, flows or invariants reference this node.\n");
    }
    out
}

pub fn render_impact_text(outcome: &ImpactOutcome, color: bool) -> String {
    match outcome {
        ImpactOutcome::Found(report) => render_found(report, color),
        ImpactOutcome::NotFound { node_id, known_ids } => {
            let mut out = format!("Unknown node id: {node_id}\n");
            out.push_str(&format!("Known node ids ({}):\n", known_ids.len()));
            for id in known_ids {
                out.push_str(&format!("  - {id}\n"));
            }
            out
        }
    }
}

pub fn render_impact_json(outcome: &ImpactOutcome) -> Result<String, String> {
    let mut value = serde_json::to_value(outcome).map_err(|err| err.to_string())?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "schema_version".to_string(),
            serde_json::json!(REPORT_SCHEMA_VERSION),
        );
        object.insert("exit_code".to_string(), serde_json::json!(outcome.exit_code()));
    }
    serde_json::to_string_pretty(&value).map_err(|err| err.to_string())
}
