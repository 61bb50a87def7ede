//! Declarative node topology definitions.
//!
//! A `Topology` is the caller-side description of the filter chain: one
//! `NodeSpec` per dropdown, each naming the record field it filters on
//! and optionally the field of the node it depends on. The cascade turns
//! this into live filter nodes when records are loaded.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CascadeError;

// ─── NodeSpec ────────────────────────────────────────────────────────────────

/// Declaration of one filter node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Record field this node filters on.
    pub field: String,
    /// Field of the parent node, or none for a root over the full set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Display label; defaults to the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether more than one value may be selected at once.
    #[serde(default)]
    pub multi: bool,
}

impl NodeSpec {
    /// A root node depending on the full record set.
    pub fn root(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            parent: None,
            label: None,
            multi: false,
        }
    }

    /// A node depending on the node filtering `parent`.
    pub fn child(field: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            parent: Some(parent.into()),
            label: None,
            multi: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }
}

/// Shorthand syntax: `FIELD`, `FIELD:PARENT`, or `FIELD:PARENT:multi`
/// (`FIELD::multi` for a multi-select root).
impl FromStr for NodeSpec {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let field = parts.next().unwrap_or("").trim();
        if field.is_empty() {
            return Err(CascadeError::InvalidNodeSpec {
                spec: s.to_string(),
                reason: "missing field name".to_string(),
            });
        }
        let parent = parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        let multi = match parts.next().map(str::trim) {
            None | Some("") => false,
            Some("multi") => true,
            Some(other) => {
                return Err(CascadeError::InvalidNodeSpec {
                    spec: s.to_string(),
                    reason: format!("expected 'multi', got '{}'", other),
                });
            }
        };
        let mut spec = match parent {
            Some(p) => NodeSpec::child(field, p),
            None => NodeSpec::root(field),
        };
        if multi {
            spec = spec.multi();
        }
        Ok(spec)
    }
}

// ─── Topology ────────────────────────────────────────────────────────────────

/// Ordered collection of node declarations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    pub nodes: Vec<NodeSpec>,
}

impl Topology {
    pub fn new(nodes: Vec<NodeSpec>) -> Self {
        Self { nodes }
    }

    pub fn from_json(src: &str) -> Result<Self, CascadeError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<NodeSpec> for Topology {
    fn from_iter<I: IntoIterator<Item = NodeSpec>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_spec() {
        let spec = NodeSpec::root("Region");
        assert_eq!(spec.field, "Region");
        assert!(spec.parent.is_none());
        assert!(!spec.multi);
    }

    #[test]
    fn test_child_with_label_and_multi() {
        let spec = NodeSpec::child("Type", "Park").label("Trail Type").multi();
        assert_eq!(spec.parent.as_deref(), Some("Park"));
        assert_eq!(spec.label.as_deref(), Some("Trail Type"));
        assert!(spec.multi);
    }

    #[test]
    fn test_parse_shorthand() {
        let spec: NodeSpec = "City:Region".parse().unwrap();
        assert_eq!(spec.field, "City");
        assert_eq!(spec.parent.as_deref(), Some("Region"));
        assert!(!spec.multi);

        let spec: NodeSpec = "Accessible:Type:multi".parse().unwrap();
        assert!(spec.multi);

        let spec: NodeSpec = "Region".parse().unwrap();
        assert!(spec.parent.is_none());

        let spec: NodeSpec = "Tags::multi".parse().unwrap();
        assert!(spec.parent.is_none());
        assert!(spec.multi);
    }

    #[test]
    fn test_parse_shorthand_errors() {
        assert!("".parse::<NodeSpec>().is_err());
        assert!("City:Region:often".parse::<NodeSpec>().is_err());
    }

    #[test]
    fn test_topology_from_json() {
        let json = r#"[
            {"field": "Region"},
            {"field": "City", "parent": "Region"},
            {"field": "Accessible", "parent": "City", "multi": true}
        ]"#;
        let topo = Topology::from_json(json).unwrap();
        assert_eq!(topo.nodes.len(), 3);
        assert_eq!(topo.nodes[1].parent.as_deref(), Some("Region"));
        assert!(topo.nodes[2].multi);
    }
}
