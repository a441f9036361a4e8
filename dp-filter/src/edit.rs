//! Copy-on-write structural edits of a filter tree.
//!
//! Every edit leaves the receiver untouched and returns a new root. Groups
//! are addressed by a path of child indices from the root; the empty path is
//! the root itself.

use crate::coerce::is_truthy;
use crate::errors::FilterError;
use crate::operators::{Operator, OperatorFamily};
use crate::types::{Condition, DataType, FilterGroup, FilterNode, FilterRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field that can be filtered on, with the value new rules start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub field: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldConfig {
    pub fn new(field: &str, data_type: DataType) -> Self {
        Self {
            field: field.to_string(),
            data_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    fn initial_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    /// Fields whose name contains `term`, ignoring case
    pub fn search<'a>(fields: &'a [FieldConfig], term: &str) -> Vec<&'a FieldConfig> {
        let term = term.to_lowercase();
        fields
            .iter()
            .filter(|f| f.field.to_lowercase().contains(&term))
            .collect()
    }
}

impl FilterGroup {
    /// Append a rule defaulted from the first configured field.
    pub fn with_rule_added(
        &self,
        path: &[usize],
        fields: &[FieldConfig],
    ) -> Result<FilterGroup, FilterError> {
        self.edit(path, |group| {
            let condition = (!group.children.is_empty()).then_some(group.condition);
            let rule = match fields.first() {
                Some(config) => FilterRule {
                    condition,
                    field: config.field.clone(),
                    operator: Operator::Equals.to_string(),
                    data_type: Some(config.data_type),
                    value: config.initial_value(),
                },
                None => FilterRule {
                    condition,
                    field: String::new(),
                    operator: Operator::Equals.to_string(),
                    data_type: Some(DataType::String),
                    value: Value::String(String::new()),
                },
            };
            group.children.push(FilterNode::Rule(rule));
            Ok(())
        })
    }

    /// Append an empty AND group.
    pub fn with_group_added(&self, path: &[usize]) -> Result<FilterGroup, FilterError> {
        self.edit(path, |group| {
            group
                .children
                .push(FilterNode::Group(FilterGroup::new(Condition::And)));
            Ok(())
        })
    }

    pub fn with_child_removed(
        &self,
        path: &[usize],
        index: usize,
    ) -> Result<FilterGroup, FilterError> {
        self.edit(path, |group| {
            check_index(group, index)?;
            group.children.remove(index);
            Ok(())
        })
    }

    pub fn with_child_replaced(
        &self,
        path: &[usize],
        index: usize,
        child: impl Into<FilterNode>,
    ) -> Result<FilterGroup, FilterError> {
        let child = child.into();
        self.edit(path, move |group| {
            check_index(group, index)?;
            group.children[index] = child;
            Ok(())
        })
    }

    /// Set a group's condition and copy it onto the display tag of its
    /// direct child rules. Nested groups keep their own condition.
    pub fn with_condition(
        &self,
        path: &[usize],
        condition: Condition,
    ) -> Result<FilterGroup, FilterError> {
        self.edit(path, |group| {
            group.condition = condition;
            for child in group.children.iter_mut() {
                if let FilterNode::Rule(rule) = child {
                    rule.condition = Some(condition);
                }
            }
            Ok(())
        })
    }

    /// Point a rule at another field: its data type comes from the field
    /// config, the operator resets to `equals` and the value to the default.
    /// Unknown fields leave the tree unchanged.
    pub fn with_field_changed(
        &self,
        path: &[usize],
        index: usize,
        field: &str,
        fields: &[FieldConfig],
    ) -> Result<FilterGroup, FilterError> {
        let Some(config) = fields.iter().find(|f| f.field == field) else {
            return Ok(self.clone());
        };
        self.edit(path, |group| {
            let rule = rule_at_mut(group, index)?;
            rule.field = config.field.clone();
            rule.data_type = Some(config.data_type);
            rule.operator = Operator::Equals.to_string();
            rule.value = config.initial_value();
            Ok(())
        })
    }

    /// Switch a rule's operator and reshape its value to fit.
    pub fn with_operator_changed(
        &self,
        path: &[usize],
        index: usize,
        operator: &str,
    ) -> Result<FilterGroup, FilterError> {
        self.edit(path, |group| {
            let rule = rule_at_mut(group, index)?;
            rule.operator = operator.to_string();
            rule.value = reshape_value(operator, std::mem::take(&mut rule.value));
            Ok(())
        })
    }

    fn edit(
        &self,
        path: &[usize],
        apply: impl FnOnce(&mut FilterGroup) -> Result<(), FilterError>,
    ) -> Result<FilterGroup, FilterError> {
        let mut root = self.clone();
        apply(group_at_mut(&mut root, path)?)?;
        Ok(root)
    }

    /// Nested group at `path`, if the path leads to one.
    pub fn group_at(&self, path: &[usize]) -> Option<&FilterGroup> {
        let mut current = self;
        for &index in path {
            match current.children.get(index)? {
                FilterNode::Group(group) => current = group,
                FilterNode::Rule(_) => return None,
            }
        }
        Some(current)
    }
}

/// Turn comma-separated user input into a list value, trimming each item.
pub fn list_value_from_input(input: &str) -> Value {
    Value::Array(
        input
            .split(',')
            .map(|item| Value::String(item.trim().to_string()))
            .collect(),
    )
}

fn reshape_value(operator: &str, value: Value) -> Value {
    let family = operator.parse::<Operator>().map(|op| op.family()).ok();
    match family {
        Some(OperatorFamily::Range) => match value {
            Value::Array(ref bounds) if bounds.len() == 2 => value,
            _ => Value::Array(vec![Value::Null, Value::Null]),
        },
        Some(OperatorFamily::Unary) => Value::String(String::new()),
        Some(OperatorFamily::List) => match value {
            Value::Array(_) => value,
            scalar if is_truthy(&scalar) => Value::Array(vec![scalar]),
            _ => Value::Array(Vec::new()),
        },
        Some(OperatorFamily::Scalar) | None => match value {
            Value::Array(items) => items
                .into_iter()
                .next()
                .filter(|first| !first.is_null())
                .unwrap_or_else(|| Value::String(String::new())),
            scalar => scalar,
        },
    }
}

fn group_at_mut<'a>(
    root: &'a mut FilterGroup,
    path: &[usize],
) -> Result<&'a mut FilterGroup, FilterError> {
    let mut current = root;
    for (depth, &index) in path.iter().enumerate() {
        current = match current.children.get_mut(index) {
            Some(FilterNode::Group(group)) => group,
            Some(FilterNode::Rule(_)) => return Err(FilterError::NotAGroup(path[..=depth].to_vec())),
            None => return Err(FilterError::PathNotFound(path[..=depth].to_vec())),
        };
    }
    Ok(current)
}

fn rule_at_mut(group: &mut FilterGroup, index: usize) -> Result<&mut FilterRule, FilterError> {
    check_index(group, index)?;
    match &mut group.children[index] {
        FilterNode::Rule(rule) => Ok(rule),
        FilterNode::Group(_) => Err(FilterError::NotARule(index)),
    }
}

fn check_index(group: &FilterGroup, index: usize) -> Result<(), FilterError> {
    if index >= group.children.len() {
        return Err(FilterError::IndexOutOfBounds {
            index,
            len: group.children.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::new("gene", DataType::String),
            FieldConfig::new("qual", DataType::Number).with_default(json!(30)),
            FieldConfig::new("reviewed", DataType::Boolean).with_default(json!(false)),
        ]
    }

    fn rule_at(group: &FilterGroup, index: usize) -> &FilterRule {
        match &group.children[index] {
            FilterNode::Rule(rule) => rule,
            FilterNode::Group(_) => panic!("Expected rule at {}", index),
        }
    }

    #[test]
    fn test_add_rule_defaults() {
        let root = FilterGroup::new(Condition::Or);
        let once = root.with_rule_added(&[], &fields()).unwrap();
        assert!(root.is_empty());

        let first = rule_at(&once, 0);
        assert_eq!(first.field, "gene");
        assert_eq!(first.operator, "equals");
        assert_eq!(first.data_type, Some(DataType::String));
        assert_eq!(first.value, json!(""));
        assert_eq!(first.condition, None);

        let twice = once.with_rule_added(&[], &fields()).unwrap();
        assert_eq!(rule_at(&twice, 1).condition, Some(Condition::Or));
    }

    #[test]
    fn test_add_rule_without_fields() {
        let root = FilterGroup::new(Condition::And)
            .with_rule_added(&[], &[])
            .unwrap();
        let rule = rule_at(&root, 0);
        assert!(rule.field.is_empty());
        assert_eq!(rule.data_type, Some(DataType::String));
    }

    #[test]
    fn test_nested_edit_by_path() {
        let root = FilterGroup::new(Condition::And)
            .with_rule_added(&[], &fields())
            .unwrap()
            .with_group_added(&[])
            .unwrap();
        let edited = root.with_rule_added(&[1], &fields()).unwrap();
        assert!(root.group_at(&[1]).unwrap().is_empty());
        assert_eq!(edited.group_at(&[1]).unwrap().children.len(), 1);

        assert!(matches!(
            root.with_rule_added(&[0], &fields()),
            Err(FilterError::NotAGroup(path)) if path == vec![0]
        ));
        assert!(matches!(
            root.with_group_added(&[1, 5]),
            Err(FilterError::PathNotFound(path)) if path == vec![1, 5]
        ));
    }

    #[test]
    fn test_remove_and_replace() {
        let root = FilterGroup::new(Condition::And)
            .with_rule_added(&[], &fields())
            .unwrap()
            .with_group_added(&[])
            .unwrap();
        let removed = root.with_child_removed(&[], 0).unwrap();
        assert_eq!(removed.children.len(), 1);
        assert!(matches!(removed.children[0], FilterNode::Group(_)));
        assert_eq!(root.children.len(), 2);

        let replacement = FilterRule::new("qual", "greater_than", DataType::Number, json!(20));
        let replaced = root.with_child_replaced(&[], 1, replacement.clone()).unwrap();
        assert_eq!(rule_at(&replaced, 1), &replacement);

        assert!(matches!(
            root.with_child_removed(&[], 9),
            Err(FilterError::IndexOutOfBounds { index: 9, len: 2 })
        ));
    }

    #[test]
    fn test_condition_broadcast_skips_nested_groups() {
        let root = FilterGroup::new(Condition::And)
            .with_rule_added(&[], &fields())
            .unwrap()
            .with_group_added(&[])
            .unwrap()
            .with_rule_added(&[1], &fields())
            .unwrap()
            .with_rule_added(&[1], &fields())
            .unwrap();
        let switched = root.with_condition(&[], Condition::Or).unwrap();
        assert_eq!(switched.condition, Condition::Or);
        assert_eq!(rule_at(&switched, 0).condition, Some(Condition::Or));
        let nested = switched.group_at(&[1]).unwrap();
        assert_eq!(nested.condition, Condition::And);
        assert_eq!(rule_at(nested, 1).condition, Some(Condition::And));
    }

    #[test]
    fn test_field_change_resets_rule() {
        let root = FilterGroup::new(Condition::And)
            .with_rule_added(&[], &fields())
            .unwrap()
            .with_operator_changed(&[], 0, "contains")
            .unwrap();
        let changed = root.with_field_changed(&[], 0, "qual", &fields()).unwrap();
        let rule = rule_at(&changed, 0);
        assert_eq!(rule.field, "qual");
        assert_eq!(rule.data_type, Some(DataType::Number));
        assert_eq!(rule.operator, "equals");
        assert_eq!(rule.value, json!(30));

        let unknown = root.with_field_changed(&[], 0, "nope", &fields()).unwrap();
        assert_eq!(unknown, root);
    }

    #[test]
    fn test_operator_change_reshapes_value() {
        let base = FilterGroup::and(vec![FilterRule::new(
            "qual",
            "equals",
            DataType::Number,
            json!(30),
        )
        .into()]);

        let range = base.with_operator_changed(&[], 0, "between").unwrap();
        assert_eq!(rule_at(&range, 0).value, json!([null, null]));

        let list = base.with_operator_changed(&[], 0, "in").unwrap();
        assert_eq!(rule_at(&list, 0).value, json!([30]));

        let back = list.with_operator_changed(&[], 0, "equals").unwrap();
        assert_eq!(rule_at(&back, 0).value, json!(30));

        let unary = base.with_operator_changed(&[], 0, "is_null").unwrap();
        assert_eq!(rule_at(&unary, 0).value, json!(""));

        let empty_list = unary.with_operator_changed(&[], 0, "not_in").unwrap();
        assert_eq!(rule_at(&empty_list, 0).value, json!([]));

        let from_blank_range = range.with_operator_changed(&[], 0, "less_than").unwrap();
        assert_eq!(rule_at(&from_blank_range, 0).value, json!(""));

        let kept_pair = base
            .with_child_replaced(
                &[],
                0,
                FilterRule::new("qual", "between", DataType::Number, json!([1, 2])),
            )
            .unwrap()
            .with_operator_changed(&[], 0, "not_between")
            .unwrap();
        assert_eq!(rule_at(&kept_pair, 0).value, json!([1, 2]));
    }

    #[test]
    fn test_operator_change_on_group_fails() {
        let root = FilterGroup::new(Condition::And).with_group_added(&[]).unwrap();
        assert!(matches!(
            root.with_operator_changed(&[], 0, "equals"),
            Err(FilterError::NotARule(0))
        ));
    }

    #[test]
    fn test_field_search_and_list_input() {
        let fields = fields();
        let found: Vec<_> = FieldConfig::search(&fields, "QU")
            .into_iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(found, vec!["qual"]);
        assert_eq!(list_value_from_input(" a, b ,c"), json!(["a", "b", "c"]));
    }
}
