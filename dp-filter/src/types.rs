use crate::errors::FilterError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum_macros::EnumIter;

/// Boolean combinator of a group
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::And => write!(f, "AND"),
            Condition::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(Condition::And),
            "OR" => Ok(Condition::Or),
            _ => Err(FilterError::UnknownCondition(s.to_string())),
        }
    }
}

/// Semantic kind of a record field; decides which operators apply
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
    Array,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Array => "array",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "number" => Ok(DataType::Number),
            "boolean" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            "array" => Ok(DataType::Array),
            _ => Err(FilterError::UnknownDataType(s.to_string())),
        }
    }
}

/// Leaf condition comparing one record field against `value`.
///
/// `operator` keeps the persisted identifier verbatim so trees written by
/// newer versions survive a round trip; it is narrowed to
/// [`crate::Operator`] only when the rule is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    /// Display tag copied from the parent group; never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub value: Value,
}

impl FilterRule {
    pub fn new(field: &str, operator: &str, data_type: DataType, value: Value) -> Self {
        Self {
            condition: None,
            field: field.to_string(),
            operator: operator.to_string(),
            data_type: Some(data_type),
            value,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub condition: Condition,
    #[serde(default)]
    pub children: Vec<FilterNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterNode {
    Rule(FilterRule),
    Group(FilterGroup),
}

impl From<FilterRule> for FilterNode {
    fn from(rule: FilterRule) -> Self {
        FilterNode::Rule(rule)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

// Serializes a borrowed root with its "type": "group" tag, avoiding a clone.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RootRef<'a> {
    Group(&'a FilterGroup),
}

impl FilterGroup {
    /// Create an empty group
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            children: Vec::new(),
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self {
            condition: Condition::And,
            children,
        }
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self {
            condition: Condition::Or,
            children,
        }
    }

    pub fn with_child(mut self, child: impl Into<FilterNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Parse a persisted tree. The root must be tagged `"type": "group"`.
    pub fn from_json(input: &str) -> Result<Self, FilterError> {
        Self::from_node(serde_json::from_str(input)?)
    }

    pub fn from_json_value(value: Value) -> Result<Self, FilterError> {
        Self::from_node(serde_json::from_value(value)?)
    }

    pub fn from_yaml(input: &str) -> Result<Self, FilterError> {
        Self::from_node(serde_yaml_ng::from_str(input)?)
    }

    fn from_node(node: FilterNode) -> Result<Self, FilterError> {
        match node {
            FilterNode::Group(group) => Ok(group),
            FilterNode::Rule(_) => Err(FilterError::RootNotAGroup),
        }
    }

    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string(&RootRef::Group(self))?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string_pretty(&RootRef::Group(self))?)
    }

    pub fn to_json_value(&self) -> Result<Value, FilterError> {
        Ok(serde_json::to_value(RootRef::Group(self))?)
    }

    pub fn to_yaml(&self) -> Result<String, FilterError> {
        Ok(serde_yaml_ng::to_string(&RootRef::Group(self))?)
    }
}
