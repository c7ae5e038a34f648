// SPDX-License-Identifier: Apache-2.0
//! Direct-neighbour impact queries. No transitive closure.

use contractmap_model::{
    Document, EdgeRecord, FlowRole, ImpactEdge, ImpactFlow, ImpactInvariant, ImpactOutcome,
    ImpactReport, Relation, StepTarget, Then,
};
use tracing::debug;

pub fn impact(document: &Document, node_id: &str) -> ImpactOutcome {
    let Some(node) = document.node(node_id) else {
        debug!(node_id, "impact query on unknown node");
        return ImpactOutcome::NotFound {
            node_id: node_id.to_string(),
            known_ids: document.node_ids(),
        };
    };

    let report = ImpactReport {
        node_id: node_id.to_string(),
        kind: document.node_kind(node_id).to_string(),
        loc: node.loc.clone(),
        outgoing: document.edges_from(node_id).map(impact_edge).collect(),
        incoming: document.edges_to(node_id).map(impact_edge).collect(),
        flows: containing_flows(document, node_id),
        invariants: document
            .invariants
            .iter()
            .filter(|invariant| invariant.scope.iter().any(|id| id == node_id))
            .map(|invariant| ImpactInvariant {
                id: invariant.id.clone(),
                rule: invariant.rule.clone(),
                enforce: invariant.enforce.clone(),
            })
            .collect(),
    };
    debug!(
        node_id,
        outgoing = report.outgoing.len(),
        incoming = report.incoming.len(),
        flows = report.flows.len(),
        invariants = report.invariants.len(),
        "impact computed"
    );
    ImpactOutcome::Found(report)
}

fn impact_edge(edge: &EdgeRecord) -> ImpactEdge {
    ImpactEdge {
        from: edge.from.clone(),
        to: edge.to.clone(),
        rel: edge.rel.clone(),
        note: edge.note.clone(),
        co_change: edge.relation() == Relation::CoChange,
    }
}

fn containing_flows(document: &Document, node_id: &str) -> Vec<ImpactFlow> {
    document
        .flows
        .iter()
        .filter_map(|(name, flow)| {
            let mut roles = Vec::new();
            for (index, step) in flow.steps.iter().enumerate() {
                if step.node == node_id {
                    roles.push(FlowRole::Step { index });
                }
                match &step.then {
                    Then::Target(raw) => {
                        if StepTarget::classify(raw).node() == Some(node_id) {
                            roles.push(FlowRole::Jump { index });
                        }
                    }
                    Then::Branch(arms) => {
                        for (label, raw) in arms {
                            if StepTarget::classify(raw).node() == Some(node_id) {
                                roles.push(FlowRole::Branch {
                                    index,
                                    label: label.clone(),
                                });
                            }
                        }
                    }
                }
            }
            (!roles.is_empty()).then(|| ImpactFlow {
                name: name.clone(),
                trigger: flow.trigger.clone(),
                roles,
            })
        })
        .collect()
}
