// SPDX-License-Identifier: Apache-2.0

use contractmap_model::{CheckRecord, CheckStatus, InvariantRecord, Phase};

use super::{log_record, VerifyContext};

/// Scope is checked structurally; the rule text itself always ends up as a WARN.
pub fn verify_invariants(ctx: &VerifyContext<'_>) -> Vec<CheckRecord> {
    ctx.document
        .invariants
        .iter()
        .map(|invariant| {
            let row = verify_invariant(ctx, invariant);
            log_record(&row);
            row
        })
        .collect()
}

fn verify_invariant(ctx: &VerifyContext<'_>, invariant: &InvariantRecord) -> CheckRecord {
    let row = |status, message: String| {
        CheckRecord::new(Phase::Invariants, invariant.id.as_str(), "scope", status, message)
    };
    if invariant.scope.is_empty() {
        return row(CheckStatus::Fail, "scope is empty".to_string());
    }

    let missing = invariant
        .scope
        .iter()
        .filter(|id| !ctx.document.contains_node(id))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return row(
            CheckStatus::Fail,
            format!("scope nodes missing: {}", missing.join(", ")),
        );
    }

    let unreadable = invariant
        .scope
        .iter()
        .filter_map(|id| match ctx.node_path(id) {
            None => Some(format!("{id} (no loc)")),
            Some(path) if !ctx.fs.is_readable(&path) => Some(ctx.display_path(&path)),
            Some(_) => None,
        })
        .collect::<Vec<_>>();
    if !unreadable.is_empty() {
        return row(
            CheckStatus::Fail,
            format!("scoped files not found: {}", unreadable.join(", ")),
        );
    }

    let mut message = format!("manual review: {}", invariant.rule.trim());
    if let Some(enforce) = invariant.enforce.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        message.push_str(&format!(" (enforce: {enforce})"));
    }
    row(CheckStatus::Warn, message)
}
