// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Contract map model SSOT.
//!
//! The document types mirror the on-disk contract map; the record types are what the
//! verification core hands back to callers. Nothing here performs I/O.

mod document;
mod ids;
mod report;
mod serde_helpers;

pub use document::{
    Document, EdgeRecord, FlowRecord, InvariantRecord, Meta, NodeRecord, Step, StepTarget, Then,
    TERMINAL_DONE, TERMINAL_FAIL, TERMINAL_NEXT,
};
pub use ids::{EndpointRoute, NodeId, NodeKind, Relation, HTTP_METHODS};
pub use report::{
    CheckRecord, CheckStatus, FlowRole, ImpactEdge, ImpactFlow, ImpactInvariant, ImpactOutcome,
    ImpactReport, Phase, RunSummary, VerifyReport,
};

pub const CRATE_NAME: &str = "contractmap-model";
