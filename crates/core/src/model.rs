use serde::{Deserialize, Serialize};

use crate::error::{FundmapError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A leaf amount as it appears in the document. Published datasets store
/// pledges either as JSON numbers or as numeric strings; any other JSON
/// shape is kept so that conversion can reject it as invalid data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Other(_) => None,
        }
    }
}

/// Input tree exactly as deserialized from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
}

impl RawNode {
    pub fn branch(name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            name: name.into(),
            category: None,
            children: Some(children),
            value: None,
        }
    }

    pub fn leaf(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            children: None,
            value: Some(RawValue::Number(value)),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| FundmapError::Fetch(format!("parse: {e}")))
    }
}

/// Shape-checked input: every node is decided to be a leaf or a branch once,
/// at conversion time.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyInput {
    Leaf {
        name: String,
        category: String,
        value: f64,
    },
    Branch {
        name: String,
        children: Vec<HierarchyInput>,
    },
}

impl HierarchyInput {
    pub fn name(&self) -> &str {
        match self {
            HierarchyInput::Leaf { name, .. } | HierarchyInput::Branch { name, .. } => name,
        }
    }
}

impl TryFrom<&RawNode> for HierarchyInput {
    type Error = FundmapError;

    fn try_from(raw: &RawNode) -> Result<Self> {
        match &raw.children {
            Some(children) if !children.is_empty() => Ok(HierarchyInput::Branch {
                name: raw.name.clone(),
                children: children
                    .iter()
                    .map(HierarchyInput::try_from)
                    .collect::<Result<Vec<_>>>()?,
            }),
            _ => {
                let value = raw
                    .value
                    .as_ref()
                    .ok_or_else(|| FundmapError::InvalidData(format!("leaf '{}' has no value", raw.name)))?;
                let value = value.to_f64().ok_or_else(|| {
                    FundmapError::InvalidData(format!("leaf '{}' has a non-numeric value", raw.name))
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(FundmapError::InvalidData(format!(
                        "leaf '{}' has value {value}, expected a finite non-negative number",
                        raw.name
                    )));
                }
                let category = raw
                    .category
                    .clone()
                    .ok_or_else(|| FundmapError::InvalidData(format!("leaf '{}' has no category", raw.name)))?;
                Ok(HierarchyInput::Leaf {
                    name: raw.name.clone(),
                    category,
                    value,
                })
            }
        }
    }
}

impl TryFrom<RawNode> for HierarchyInput {
    type Error = FundmapError;

    fn try_from(raw: RawNode) -> Result<Self> {
        HierarchyInput::try_from(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_values_are_accepted() {
        let raw = RawNode::from_json_str(
            r#"{"name":"Pebble","category":"Product Design","value":"20338986"}"#,
        )
        .unwrap();
        let input = HierarchyInput::try_from(&raw).unwrap();
        assert_eq!(
            input,
            HierarchyInput::Leaf {
                name: "Pebble".into(),
                category: "Product Design".into(),
                value: 20338986.0
            }
        );
    }

    #[test]
    fn leaf_without_value_is_invalid() {
        let raw = RawNode::from_json_str(r#"{"name":"x","category":"c"}"#).unwrap();
        assert!(matches!(
            HierarchyInput::try_from(&raw),
            Err(FundmapError::InvalidData(_))
        ));
    }

    #[test]
    fn non_numeric_and_negative_values_are_invalid() {
        for v in [r#""abc""#, "-5"] {
            let json = format!(r#"{{"name":"x","category":"c","value":{v}}}"#);
            let raw = RawNode::from_json_str(&json).unwrap();
            assert!(matches!(
                HierarchyInput::try_from(&raw),
                Err(FundmapError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn non_scalar_values_are_invalid_data() {
        for v in ["true", r#"{"amount":5}"#, "[1, 2]"] {
            let json = format!(r#"{{"name":"x","category":"c","value":{v}}}"#);
            let raw = RawNode::from_json_str(&json).unwrap();
            assert!(matches!(raw.value, Some(RawValue::Other(_))));
            assert!(matches!(
                HierarchyInput::try_from(&raw),
                Err(FundmapError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn default_node_id_is_the_first_slot() {
        assert_eq!(NodeId::default(), NodeId(0));
        assert_eq!(NodeId::default().index(), 0);
    }

    #[test]
    fn malformed_json_is_a_fetch_error() {
        assert!(matches!(
            RawNode::from_json_str("{not json"),
            Err(FundmapError::Fetch(_))
        ));
    }

    #[test]
    fn nested_branches_convert() {
        let raw = RawNode::branch(
            "root",
            vec![RawNode::branch("Games", vec![RawNode::leaf("a", "Games", 3.0)])],
        );
        let input = HierarchyInput::try_from(raw).unwrap();
        match input {
            HierarchyInput::Branch { children, .. } => assert_eq!(children[0].name(), "Games"),
            _ => panic!("expected branch"),
        }
    }
}
