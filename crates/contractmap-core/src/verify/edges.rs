// SPDX-License-Identifier: Apache-2.0

use contractmap_model::{CheckRecord, CheckStatus, EdgeRecord, NodeId, Phase, Relation};
use regex::Regex;

use super::{log_record, SourceError, VerifyContext};
use crate::matching::{
    any_match, call_patterns, quoted_literal_patterns, table_access_patterns,
    validation_call_patterns, SourceFile,
};

pub fn verify_edges(ctx: &VerifyContext<'_>) -> Vec<CheckRecord> {
    ctx.document
        .edges
        .iter()
        .map(|edge| {
            let row = verify_edge(ctx, edge);
            log_record(&row);
            row
        })
        .collect()
}

fn verify_edge(ctx: &VerifyContext<'_>, edge: &EdgeRecord) -> CheckRecord {
    let subject = edge.label();
    let fail = |message: String| {
        CheckRecord::new(Phase::Edges, subject.as_str(), "relation", CheckStatus::Fail, message)
    };

    let mut missing = Vec::new();
    if !ctx.document.contains_node(&edge.from) {
        missing.push(format!("source node missing: {}", edge.from));
    }
    if !ctx.document.contains_node(&edge.to) {
        missing.push(format!("target node missing: {}", edge.to));
    }
    if !missing.is_empty() {
        return fail(missing.join("; "));
    }

    let source = match ctx.read_node_source(&edge.from) {
        Ok(source) => source,
        Err(SourceError::NoLocation) => {
            return fail(format!("source file not found: {} declares no loc", edge.from));
        }
        Err(SourceError::Unreadable { display }) => {
            return fail(format!("source file not found: {display}")).at(display, None);
        }
    };

    let (status, message) = match edge.relation() {
        Relation::CoChange => (
            CheckStatus::Pass,
            "co_change declared; both nodes exist".to_string(),
        ),
        Relation::Validates => validates(ctx, edge, &source),
        Relation::Calls => {
            let method = NodeId::parse(&edge.to).method_name();
            evidence(
                &source,
                call_patterns(method),
                format!("call to `{method}(` found"),
                (CheckStatus::Fail, format!("no call to `{method}(` found")),
            )
        }
        rel @ (Relation::Writes | Relation::Reads) => {
            let table = NodeId::parse(&edge.to).identifier.trim();
            evidence(
                &source,
                table_access_patterns(table),
                format!("{rel} access to `{table}` found"),
                (
                    CheckStatus::Warn,
                    format!("no direct access to `{table}` found; access may be indirect"),
                ),
            )
        }
        Relation::Emits => {
            let event = NodeId::parse(&edge.to).identifier.trim();
            evidence(
                &source,
                quoted_literal_patterns(event),
                format!("event literal `{event}` found"),
                (CheckStatus::Fail, format!("event literal `{event}` not found")),
            )
        }
        Relation::Listens => {
            let event = NodeId::parse(&edge.to).identifier.trim();
            evidence(
                &source,
                quoted_literal_patterns(event),
                format!("event literal `{event}` found"),
                (
                    CheckStatus::Warn,
                    format!("event literal `{event}` not found; subscription may be wired elsewhere"),
                ),
            )
        }
        Relation::Custom(rel) => (
            CheckStatus::Pass,
            format!("relation `{rel}` is not statically checked"),
        ),
    };
    CheckRecord::new(Phase::Edges, subject, "relation", status, message).at(source.display, None)
}

fn validates(
    ctx: &VerifyContext<'_>,
    edge: &EdgeRecord,
    source: &SourceFile,
) -> (CheckStatus, String) {
    let schema = ctx
        .document
        .node(&edge.to)
        .and_then(|node| node.schema.as_deref())
        .map(str::trim)
        .filter(|schema| !schema.is_empty());
    let Some(schema) = schema else {
        return (
            CheckStatus::Warn,
            format!("target {} declares no schema to validate against", edge.to),
        );
    };
    evidence(
        source,
        validation_call_patterns(schema),
        format!("validation call on `{schema}` found"),
        (
            CheckStatus::Fail,
            format!("no validation call on `{schema}` found"),
        ),
    )
}

fn evidence(
    source: &SourceFile,
    patterns: Result<Vec<Regex>, regex::Error>,
    found: String,
    otherwise: (CheckStatus, String),
) -> (CheckStatus, String) {
    match patterns {
        Ok(patterns) if any_match(&patterns, &source.text) => (CheckStatus::Pass, found),
        Ok(_) => otherwise,
        Err(err) => (CheckStatus::Fail, format!("invalid pattern: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::test_support::{document, root, MemoryFs};

    const NODES: &str = r#"
nodes:
  table:tasks: { loc: db/schema.sql }
  type:Task: { loc: src/types.ts, schema: TaskSchema }
  type:Bare: { loc: src/types.ts }
  method:TaskRepository.create: { loc: src/repo.ts }
  method:TaskService.add: { loc: src/service.ts }
  event:task.created: { loc: src/events.ts }
  endpoint:POST /api/tasks: { loc: src/routes.ts }
"#;

    fn fs() -> MemoryFs {
        MemoryFs::default()
            .with("db/schema.sql", "CREATE TABLE tasks (id int);")
            .with("src/types.ts", "export const TaskSchema = z.object({});")
            .with(
                "src/repo.ts",
                "class TaskRepository {\n  create(t) { return db.query('INSERT INTO tasks VALUES (?)', t); }\n}",
            )
            .with(
                "src/service.ts",
                "export async function add(body) {\n  return repo.create(body);\n}",
            )
            .with(
                "src/routes.ts",
                "router.post('/api/tasks', (req) => {\n  const t = TaskSchema.parse(req.body);\n  bus.emit('task.created', t);\n});",
            )
    }

    fn run_with(fs: &MemoryFs, edges: &str) -> Vec<CheckRecord> {
        let doc = document(&format!("{NODES}edges:\n{edges}"));
        verify_edges(&VerifyContext::new(fs, &doc, root()))
    }

    fn run(edges: &str) -> Vec<CheckRecord> {
        run_with(&fs(), edges)
    }

    #[test]
    fn co_change_passes_whatever_the_files_contain() {
        let empty = MemoryFs::default()
            .with("db/schema.sql", "")
            .with("src/repo.ts", "");
        let rows = run_with(
            &empty,
            "  - { from: \"table:tasks\", to: \"method:TaskRepository.create\", rel: co_change }\n",
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, CheckStatus::Pass);
        assert_eq!(rows[0].subject, "table:tasks --co_change--> method:TaskRepository.create");
    }

    #[test]
    fn missing_endpoints_fail_before_any_relation_check() {
        let rows = run("  - { from: \"table:ghost\", to: \"method:Nope.x\", rel: co_change }\n");
        assert_eq!(rows[0].status, CheckStatus::Fail);
        assert!(rows[0].message.contains("source node missing: table:ghost"));
        assert!(rows[0].message.contains("target node missing: method:Nope.x"));
    }

    #[test]
    fn unreadable_source_file_fails() {
        let fs = MemoryFs::default().with("src/repo.ts", "create(t) {}");
        let rows = run_with(
            &fs,
            "  - { from: \"table:tasks\", to: \"method:TaskRepository.create\", rel: co_change }\n",
        );
        assert_eq!(rows[0].status, CheckStatus::Fail);
        assert_eq!(rows[0].message, "source file not found: db/schema.sql");
    }

    #[test]
    fn validates_needs_a_schema_and_a_call() {
        let rows = run(concat!(
            "  - { from: \"endpoint:POST /api/tasks\", to: \"type:Task\", rel: validates }\n",
            "  - { from: \"method:TaskService.add\", to: \"type:Task\", rel: validates }\n",
            "  - { from: \"endpoint:POST /api/tasks\", to: \"type:Bare\", rel: validates }\n",
        ));
        let statuses = rows.iter().map(|r| r.status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![CheckStatus::Pass, CheckStatus::Fail, CheckStatus::Warn]
        );
    }

    #[test]
    fn calls_looks_for_the_bare_method_name() {
        let rows = run(concat!(
            "  - { from: \"method:TaskService.add\", to: \"method:TaskRepository.create\", rel: calls }\n",
            "  - { from: \"table:tasks\", to: \"method:TaskRepository.create\", rel: calls }\n",
        ));
        assert_eq!(rows[0].status, CheckStatus::Pass);
        assert_eq!(rows[1].status, CheckStatus::Fail);
    }

    #[test]
    fn table_access_is_soft() {
        let rows = run(concat!(
            "  - { from: \"method:TaskRepository.create\", to: \"table:tasks\", rel: writes }\n",
            "  - { from: \"method:TaskService.add\", to: \"table:tasks\", rel: reads }\n",
        ));
        assert_eq!(rows[0].status, CheckStatus::Pass);
        assert_eq!(rows[1].status, CheckStatus::Warn);
    }

    #[test]
    fn emits_fails_but_listens_warns() {
        let rows = run(concat!(
            "  - { from: \"endpoint:POST /api/tasks\", to: \"event:task.created\", rel: emits }\n",
            "  - { from: \"method:TaskService.add\", to: \"event:task.created\", rel: emits }\n",
            "  - { from: \"method:TaskService.add\", to: \"event:task.created\", rel: listens }\n",
        ));
        let statuses = rows.iter().map(|r| r.status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![CheckStatus::Pass, CheckStatus::Fail, CheckStatus::Warn]
        );
    }

    #[test]
    fn custom_relations_pass() {
        let rows = run("  - { from: \"table:tasks\", to: \"type:Task\", rel: mirrors }\n");
        assert_eq!(rows[0].status, CheckStatus::Pass);
        assert!(rows[0].message.contains("`mirrors`"));
    }
}
