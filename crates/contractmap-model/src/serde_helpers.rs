// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

/// `version: 1` and `version: "1.0"` are both accepted and kept as text.
pub mod version_tag {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Scalar::deserialize(deserializer)?.into_text())
    }
}

/// Enumerated literals and fk entries may be written as bare YAML scalars.
pub mod string_list {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Vec<Scalar>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(Scalar::into_text)
            .collect())
    }
}

pub fn default_version() -> String {
    "1".to_string()
}
