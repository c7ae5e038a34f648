// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use contractmap_core::{impact, verify, AdapterError, Fs};
use contractmap_model::Document;
use criterion::{criterion_group, criterion_main, Criterion};

const ENTITIES: usize = 200;

struct BenchFs {
    files: BTreeMap<PathBuf, String>,
}

impl Fs for BenchFs {
    fn read_text(&self, path: &Path) -> Result<String, AdapterError> {
        self.files.get(path).cloned().ok_or_else(|| AdapterError::Io {
            op: "read",
            path: path.to_path_buf(),
            detail: "not found".to_string(),
        })
    }
}

fn fixture() -> (BenchFs, Document) {
    let mut schema = String::new();
    let mut repo = String::from("export class Repository {\n");
    let mut yaml = String::from("meta: { name: bench }\nnodes:\n");
    for n in 0..ENTITIES {
        schema.push_str(&format!("CREATE TABLE IF NOT EXISTS entity_{n} (id int);\n"));
        repo.push_str(&format!(
            "  async save{n}(row) {{\n    return db.run('INSERT INTO entity_{n} VALUES (?)', row);\n  }}\n"
        ));
        yaml.push_str(&format!(
            "  table:entity_{n}: {{ loc: \"db/schema.sql:{}\" }}\n",
            n + 1
        ));
        yaml.push_str(&format!(
            "  method:Repository.save{n}: {{ loc: \"src/repo.ts:{}\" }}\n",
            n * 3 + 2
        ));
    }
    repo.push_str("}\n");
    yaml.push_str("edges:\n");
    for n in 0..ENTITIES {
        yaml.push_str(&format!(
            "  - {{ from: \"table:entity_{n}\", to: \"method:Repository.save{n}\", rel: co_change }}\n"
        ));
        yaml.push_str(&format!(
            "  - {{ from: \"method:Repository.save{n}\", to: \"table:entity_{n}\", rel: writes }}\n"
        ));
    }
    let mut files = BTreeMap::new();
    files.insert(PathBuf::from("/bench/db/schema.sql"), schema);
    files.insert(PathBuf::from("/bench/src/repo.ts"), repo);
    let document = match serde_yaml::from_str(&yaml) {
        Ok(document) => document,
        Err(err) => panic!("bench fixture does not parse: {err}"),
    };
    (BenchFs { files }, document)
}

fn bench_verify_synthetic_document(c: &mut Criterion) {
    let (fs, document) = fixture();
    let root = Path::new("/bench");
    c.bench_function("verify.synthetic.400_nodes_400_edges", |b| {
        b.iter(|| verify(&fs, &document, root));
    });
    c.bench_function("impact.synthetic.single_node", |b| {
        b.iter(|| impact(&document, "table:entity_100"));
    });
}

criterion_group!(benches, bench_verify_synthetic_document);
criterion_main!(benches);
