// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{NodeId, NodeKind, Relation};
use crate::serde_helpers::{self, default_version};

pub const TERMINAL_NEXT: &str = "next";
pub const TERMINAL_DONE: &str = "DONE";
pub const TERMINAL_FAIL: &str = "FAIL";

/// A loaded contract map. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(
        default = "default_version",
        deserialize_with = "serde_helpers::version_tag::deserialize"
    )]
    pub version: String,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub nodes: IndexMap<String, NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub flows: IndexMap<String, FlowRecord>,
    #[serde(default)]
    pub invariants: Vec<InvariantRecord>,
}

impl Document {
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Kind declared on the record, falling back to the id prefix.
    pub fn node_kind(&self, id: &str) -> NodeKind {
        match self.nodes.get(id).and_then(|node| node.kind.as_deref()) {
            Some(kind) => NodeKind::parse(kind),
            None => NodeKind::parse(NodeId::parse(id).kind),
        }
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a EdgeRecord> + 'a {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a EdgeRecord> + 'a {
        self.edges.iter().filter(move |edge| edge.to == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::string_list::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub values: Vec<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::string_list::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fk: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EdgeRecord {
    pub fn relation(&self) -> Relation {
        Relation::parse(&self.rel)
    }

    pub fn label(&self) -> String {
        format!("{} --{}--> {}", self.from, self.rel, self.to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub node: String,
    #[serde(default)]
    pub then: Then,
}

/// Where a step hands control next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Then {
    Target(String),
    Branch(IndexMap<String, String>),
}

impl Default for Then {
    fn default() -> Self {
        Self::Target(TERMINAL_NEXT.to_string())
    }
}

/// A single `then` value with the terminal keywords split out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTarget<'a> {
    Next,
    Done,
    Fail,
    Node(&'a str),
}

impl<'a> StepTarget<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match raw {
            TERMINAL_NEXT => Self::Next,
            TERMINAL_DONE => Self::Done,
            TERMINAL_FAIL => Self::Fail,
            other => Self::Node(other),
        }
    }

    pub fn node(self) -> Option<&'a str> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }
}

impl Then {
    /// Non-terminal node ids reachable from this step, jump and branch alike.
    pub fn node_targets(&self) -> Vec<&str> {
        match self {
            Self::Target(raw) => StepTarget::classify(raw).node().into_iter().collect(),
            Self::Branch(arms) => arms
                .values()
                .filter_map(|raw| StepTarget::classify(raw).node())
                .collect(),
        }
    }

    /// `(label, node id)` pairs for branch arms that name a node.
    pub fn branch_targets(&self) -> Vec<(&str, &str)> {
        match self {
            Self::Target(_) => Vec::new(),
            Self::Branch(arms) => arms
                .iter()
                .filter_map(|(label, raw)| {
                    StepTarget::classify(raw)
                        .node()
                        .map(|id| (label.as_str(), id))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantRecord {
    pub id: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        serde_yaml::from_str(
            r#"
version: 1
meta: { name: demo }
nodes:
  table:tasks: { loc: "db/schema.sql:3" }
  method:TaskRepository.create: { kind: method, loc: "src/repo.ts" }
  type:Status: { values: [open, 2, true] }
edges:
  - { from: "table:tasks", to: "method:TaskRepository.create", rel: co_change }
flows:
  create:
    trigger: "POST /tasks"
    steps:
      - { node: "method:TaskRepository.create", then: { ok: next, bad: FAIL, retry: "table:tasks" } }
      - { node: "table:tasks", then: DONE }
"#,
        )
        .expect("document")
    }

    #[test]
    fn decodes_defaults_and_scalars() {
        let doc = sample();
        assert_eq!(doc.version, "1");
        assert_eq!(doc.meta.root, "");
        assert_eq!(
            doc.node("type:Status").map(|n| n.values.clone()),
            Some(vec!["open".to_string(), "2".to_string(), "true".to_string()])
        );
        assert!(doc.invariants.is_empty());
    }

    #[test]
    fn nodes_keep_document_order() {
        assert_eq!(
            sample().node_ids(),
            vec![
                "table:tasks".to_string(),
                "method:TaskRepository.create".to_string(),
                "type:Status".to_string(),
            ]
        );
    }

    #[test]
    fn kind_falls_back_to_id_prefix() {
        let doc = sample();
        assert_eq!(doc.node_kind("table:tasks"), NodeKind::Table);
        assert_eq!(doc.node_kind("method:TaskRepository.create"), NodeKind::Method);
    }

    #[test]
    fn branch_targets_skip_terminals() {
        let doc = sample();
        let flow = doc.flows.get("create").expect("flow");
        assert!(matches!(flow.steps[0].then, Then::Branch(_)));
        assert_eq!(flow.steps[0].then.branch_targets(), vec![("retry", "table:tasks")]);
        assert!(flow.steps[1].then.node_targets().is_empty());
    }

    #[test]
    fn missing_then_defaults_to_next() {
        let step: Step = serde_yaml::from_str("node: a").expect("step");
        assert_eq!(step.then, Then::Target(TERMINAL_NEXT.to_string()));
    }

    #[test]
    fn edge_helpers_filter_by_endpoint() {
        let doc = sample();
        assert_eq!(doc.edges_from("table:tasks").count(), 1);
        assert_eq!(doc.edges_to("table:tasks").count(), 0);
        assert_eq!(
            doc.edges[0].label(),
            "table:tasks --co_change--> method:TaskRepository.create"
        );
    }
}
