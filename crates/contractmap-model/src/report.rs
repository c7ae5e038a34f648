// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Warn => "WARN",
        }
    }

    pub fn as_colored(self) -> &'static str {
        match self {
            Self::Pass => "\u{1b}[32mPASS\u{1b}[0m",
            Self::Fail => "\u{1b}[31mFAIL\u{1b}[0m",
            Self::Warn => "\u{1b}[33mWARN\u{1b}[0m",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Nodes,
    Edges,
    Flows,
    Invariants,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Self::Nodes, Self::Edges, Self::Flows, Self::Invariants];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
            Self::Flows => "flows",
            Self::Invariants => "invariants",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Nodes => "Nodes",
            Self::Edges => "Edges",
            Self::Flows => "Flows",
            Self::Invariants => "Invariants",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outcome of one check against one node, edge, flow or invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub phase: Phase,
    pub subject: String,
    pub check: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl CheckRecord {
    pub fn new(
        phase: Phase,
        subject: impl Into<String>,
        check: impl Into<String>,
        status: CheckStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            subject: subject.into(),
            check: check.into(),
            status,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: Option<usize>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            (Some(file), None) => Some(file.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pass: u64,
    pub fail: u64,
    pub warn: u64,
    pub total: u64,
}

impl RunSummary {
    pub fn from_records(records: &[CheckRecord]) -> Self {
        let count = |status: CheckStatus| {
            records
                .iter()
                .filter(|row| row.status == status)
                .count() as u64
        };
        Self {
            pass: count(CheckStatus::Pass),
            fail: count(CheckStatus::Fail),
            warn: count(CheckStatus::Warn),
            total: records.len() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub name: String,
    pub version: String,
    pub records: Vec<CheckRecord>,
    pub summary: RunSummary,
}

impl VerifyReport {
    pub fn new(name: impl Into<String>, version: impl Into<String>, records: Vec<CheckRecord>) -> Self {
        let summary = RunSummary::from_records(&records);
        Self {
            name: name.into(),
            version: version.into(),
            records,
            summary,
        }
    }

    pub fn phase_records(&self, phase: Phase) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(move |row| row.phase == phase)
    }

    /// WARN never gates; only FAIL does.
    pub fn exit_code(&self) -> i32 {
        if self.summary.fail > 0 {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEdge {
    pub from: String,
    pub to: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub co_change: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum FlowRole {
    Step { index: usize },
    Jump { index: usize },
    Branch { index: usize, label: String },
}

impl fmt::Display for FlowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step { index } => write!(f, "step {}", index + 1),
            Self::Jump { index } => write!(f, "jump from step {}", index + 1),
            Self::Branch { index, label } => write!(f, "branch `{label}` of step {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactFlow {
    pub name: String,
    pub trigger: String,
    pub roles: Vec<FlowRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactInvariant {
    pub id: String,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub node_id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
    pub outgoing: Vec<ImpactEdge>,
    pub incoming: Vec<ImpactEdge>,
    pub flows: Vec<ImpactFlow>,
    pub invariants: Vec<ImpactInvariant>,
}

impl ImpactReport {
    pub fn is_isolated(&self) -> bool {
        self.outgoing.is_empty()
            && self.incoming.is_empty()
            && self.flows.is_empty()
            && self.invariants.is_empty()
    }
}

/// Result of an impact query. `NotFound` is distinct from an isolated node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImpactOutcome {
    Found(ImpactReport),
    NotFound {
        node_id: String,
        known_ids: Vec<String>,
    },
}

impl ImpactOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Found(_) => 0,
            Self::NotFound { .. } => 1,
        }
    }
}
