// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const HTTP_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "ANY", "ALL",
];

/// A namespaced node id split at the first `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId<'a> {
    pub kind: &'a str,
    pub identifier: &'a str,
}

impl<'a> NodeId<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((kind, identifier)) => Self { kind, identifier },
            None => Self {
                kind: "",
                identifier: raw,
            },
        }
    }

    /// Final dot segment, e.g. `create` for `TaskRepository.create`.
    pub fn method_name(self) -> &'a str {
        self.identifier
            .rsplit('.')
            .next()
            .unwrap_or(self.identifier)
            .trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRoute<'a> {
    pub method: Option<&'a str>,
    pub path: &'a str,
}

impl<'a> EndpointRoute<'a> {
    pub fn parse(identifier: &'a str) -> Self {
        let trimmed = identifier.trim();
        if let Some((head, rest)) = trimmed.split_once(char::is_whitespace) {
            if HTTP_METHODS
                .iter()
                .any(|method| method.eq_ignore_ascii_case(head))
            {
                return Self {
                    method: Some(head),
                    path: rest.trim(),
                };
            }
        }
        Self {
            method: None,
            path: trimmed,
        }
    }
}

/// Node kinds. Anything outside the built-in set is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Type,
    Method,
    Table,
    Endpoint,
    Event,
    Custom(String),
}

impl NodeKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "type" => Self::Type,
            "method" => Self::Method,
            "table" => Self::Table,
            "endpoint" => Self::Endpoint,
            "event" => Self::Event,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Type => "type",
            Self::Method => "method",
            Self::Table => "table",
            Self::Endpoint => "endpoint",
            Self::Event => "event",
            Self::Custom(raw) => raw,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&String::deserialize(deserializer)?))
    }
}

/// Edge relations. Unknown relations are kept verbatim and never verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    CoChange,
    Validates,
    Calls,
    Writes,
    Reads,
    Emits,
    Listens,
    Custom(String),
}

impl Relation {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "co_change" => Self::CoChange,
            "validates" => Self::Validates,
            "calls" => Self::Calls,
            "writes" => Self::Writes,
            "reads" => Self::Reads,
            "emits" => Self::Emits,
            "listens" => Self::Listens,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CoChange => "co_change",
            Self::Validates => "validates",
            Self::Calls => "calls",
            Self::Writes => "writes",
            Self::Reads => "reads",
            Self::Emits => "emits",
            Self::Listens => "listens",
            Self::Custom(raw) => raw,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
