// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use contractmap_model::{CheckRecord, CheckStatus, FlowRecord, Phase};

use super::{log_record, VerifyContext};

pub fn verify_flows(ctx: &VerifyContext<'_>) -> Vec<CheckRecord> {
    let mut out = Vec::new();
    for (name, flow) in &ctx.document.flows {
        let start = out.len();
        out.push(existence(ctx, name, flow));
        reachability(name, flow, &mut out);
        out[start..].iter().for_each(log_record);
    }
    out
}

/// Every step node and every non-terminal `then` target, in encounter order.
fn referenced_ids(flow: &FlowRecord) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut ids = Vec::new();
    for step in &flow.steps {
        let targets = std::iter::once(step.node.as_str()).chain(step.then.node_targets());
        for id in targets {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn existence(ctx: &VerifyContext<'_>, name: &str, flow: &FlowRecord) -> CheckRecord {
    let missing = referenced_ids(flow)
        .into_iter()
        .filter(|id| !ctx.document.contains_node(id))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        CheckRecord::new(
            Phase::Flows,
            name,
            "existence",
            CheckStatus::Pass,
            format!("all nodes referenced by {} steps exist", flow.steps.len()),
        )
    } else {
        CheckRecord::new(
            Phase::Flows,
            name,
            "existence",
            CheckStatus::Fail,
            format!("missing nodes: {}", missing.join(", ")),
        )
    }
}

fn reachability(name: &str, flow: &FlowRecord, out: &mut Vec<CheckRecord>) {
    // Includes the branching step's own node, so a retry arm may loop back to it.
    let step_nodes = flow
        .steps
        .iter()
        .map(|step| step.node.as_str())
        .collect::<BTreeSet<_>>();
    let mut violations = 0usize;
    for (index, step) in flow.steps.iter().enumerate() {
        for (label, target) in step.then.branch_targets() {
            if step_nodes.contains(target) {
                continue;
            }
            violations += 1;
            out.push(CheckRecord::new(
                Phase::Flows,
                name,
                "reachability",
                CheckStatus::Warn,
                format!(
                    "branch {label} -> {target} (step {}) is not a step of this flow",
                    index + 1
                ),
            ));
        }
    }
    if violations == 0 {
        out.push(CheckRecord::new(
            Phase::Flows,
            name,
            "reachability",
            CheckStatus::Pass,
            "every branch target is a step of this flow",
        ));
    }
}
