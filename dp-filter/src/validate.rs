//! Completeness checks used to gate applying or persisting a filter.

use crate::operators::{Operator, OperatorFamily};
use crate::types::{DataType, FilterGroup, FilterNode, FilterRule};
use serde_json::Value;

/// True when the rule has everything it needs to be applied.
pub fn is_valid_rule(rule: &FilterRule) -> bool {
    if rule.field.is_empty() || rule.operator.is_empty() {
        return false;
    }

    match rule.operator.parse::<Operator>().map(|op| op.family()) {
        Ok(OperatorFamily::Unary) => return true,
        Ok(OperatorFamily::Range) => return is_complete_range(&rule.value),
        _ => {}
    }

    if rule.data_type == Some(DataType::Boolean) {
        return rule.value.is_boolean();
    }

    is_present(&rule.value)
}

/// True when at least one rule anywhere in the tree is valid.
pub fn is_valid_group(group: &FilterGroup) -> bool {
    group.children.iter().any(|child| match child {
        FilterNode::Rule(rule) => is_valid_rule(rule),
        FilterNode::Group(nested) => is_valid_group(nested),
    })
}

pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub(crate) fn is_complete_range(value: &Value) -> bool {
    match value {
        Value::Array(bounds) => bounds.len() == 2 && bounds.iter().all(is_present),
        _ => false,
    }
}
