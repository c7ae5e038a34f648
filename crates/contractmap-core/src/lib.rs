// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Verification core for contract maps.
//!
//! Loading, the four verification phases, impact queries and report rendering. Callers get
//! structured records back; text is produced only by [`render`].

pub mod adapters;
pub mod impact;
pub mod loader;
pub mod location;
pub mod matching;
pub mod ports;
pub mod render;
pub mod verify;

pub use adapters::RealFs;
pub use impact::impact;
pub use loader::{discover_document, load_document, parse_document, project_root_of, LoadError};
pub use location::{resolve_location, Location, ResolvedLocation};
pub use ports::{AdapterError, Fs};
pub use render::{render_impact_json, render_impact_text, render_json, render_text};
pub use verify::{verify, verify_edges, verify_flows, verify_invariants, verify_nodes, VerifyContext};

pub const CRATE_NAME: &str = "contractmap-core";
