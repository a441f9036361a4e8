use crate::operators::{label_for, Operator, OperatorFamily};
use crate::types::{DataType, FilterGroup, FilterNode, FilterRule};
use crate::validate::is_valid_rule;
use serde_json::Value;

/// Human-readable rendering of a filter tree, e.g.
/// `age Greater Than 30 AND (status Equals "active" OR status Equals "pending")`.
///
/// Invalid rules are skipped and groups left without content are dropped, so
/// an incomplete tree yields an empty string.
pub fn summarize(group: &FilterGroup) -> String {
    let parts: Vec<String> = group
        .children
        .iter()
        .filter_map(|child| match child {
            FilterNode::Rule(rule) => is_valid_rule(rule).then(|| describe_rule(rule)),
            FilterNode::Group(nested) => {
                let inner = summarize(nested);
                (!inner.is_empty()).then(|| format!("({})", inner))
            }
        })
        .collect();
    parts.join(&format!(" {} ", group.condition))
}

pub fn describe_rule(rule: &FilterRule) -> String {
    let label = label_for(&rule.operator);
    let family = rule.operator.parse::<Operator>().ok().map(|op| op.family());
    if family == Some(OperatorFamily::Unary) {
        return format!("{} {}", rule.field, label);
    }
    format!("{} {} {}", rule.field, label, format_value(rule, family))
}

fn format_value(rule: &FilterRule, family: Option<OperatorFamily>) -> String {
    match &rule.value {
        Value::Array(bounds) if family == Some(OperatorFamily::Range) && bounds.len() == 2 => {
            format!("{} to {}", plain(&bounds[0]), plain(&bounds[1]))
        }
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(plain).collect::<Vec<_>>().join(", ")
        ),
        scalar if rule.data_type == Some(DataType::String) => format!("\"{}\"", plain(scalar)),
        scalar => plain(scalar),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
