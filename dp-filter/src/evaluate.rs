//! Rule and group evaluation.
//!
//! Evaluation is fail-closed: a rule whose operator is unknown, or whose
//! value does not have the shape its operator needs, never matches. The
//! `try_*` variant reports why instead.

use crate::coerce::{
    as_bool, as_number, as_text, as_timestamp, normalize_missing, same_value,
};
use crate::errors::FilterError;
use crate::operators::{Operand, Operator};
use crate::record::Record;
use crate::types::{Condition, DataType, FilterGroup, FilterNode, FilterRule};
use log::{debug, trace};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Evaluate a single rule against `record`; malformed rules never match.
pub fn evaluate_rule<R: Record + ?Sized>(rule: &FilterRule, record: &R) -> bool {
    rule_matches(rule, record, &PatternCache::default())
}

fn rule_matches<R: Record + ?Sized>(rule: &FilterRule, record: &R, patterns: &PatternCache) -> bool {
    match evaluate_with(rule, record, patterns) {
        Ok(matched) => matched,
        Err(e) => {
            debug!("Rule on field '{}' treated as non-match: {}", rule.field, e);
            false
        }
    }
}

/// Evaluate a group recursively. An empty group matches everything.
pub fn evaluate_group<R: Record + ?Sized>(group: &FilterGroup, record: &R) -> bool {
    group_matches(group, record, &PatternCache::default())
}

fn group_matches<R: Record + ?Sized>(
    group: &FilterGroup,
    record: &R,
    patterns: &PatternCache,
) -> bool {
    if group.children.is_empty() {
        return true;
    }
    let mut results = group
        .children
        .iter()
        .map(|child| node_matches(child, record, patterns));
    match group.condition {
        Condition::And => results.all(|matched| matched),
        Condition::Or => results.any(|matched| matched),
    }
}

pub fn evaluate_node<R: Record + ?Sized>(node: &FilterNode, record: &R) -> bool {
    node_matches(node, record, &PatternCache::default())
}

fn node_matches<R: Record + ?Sized>(node: &FilterNode, record: &R, patterns: &PatternCache) -> bool {
    match node {
        FilterNode::Rule(rule) => rule_matches(rule, record, patterns),
        FilterNode::Group(group) => group_matches(group, record, patterns),
    }
}

/// Records from `records` matching `group`, in input order. Regex patterns
/// are compiled once for the whole slice.
pub fn filter_records<'a, R: Record>(group: &FilterGroup, records: &'a [R]) -> Vec<&'a R> {
    let patterns = PatternCache::default();
    records
        .iter()
        .filter(|record| group_matches(group, *record, &patterns))
        .collect()
}

pub fn try_evaluate_rule<R: Record + ?Sized>(
    rule: &FilterRule,
    record: &R,
) -> Result<bool, FilterError> {
    evaluate_with(rule, record, &PatternCache::default())
}

/// Compiled regex patterns, keyed by pattern text.
#[derive(Default)]
struct PatternCache {
    compiled: RefCell<HashMap<String, Regex>>,
}

impl PatternCache {
    fn get(&self, pattern: &str) -> Result<Regex, FilterError> {
        if let Some(regex) = self.compiled.borrow().get(pattern) {
            return Ok(regex.clone());
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterError::InvalidPattern(e.to_string()))?;
        self.compiled
            .borrow_mut()
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.borrow().len()
    }
}

fn evaluate_with<R: Record + ?Sized>(
    rule: &FilterRule,
    record: &R,
    patterns: &PatternCache,
) -> Result<bool, FilterError> {
    let operator: Operator = rule.operator.parse()?;
    let operand = Operand::narrow(operator, &rule.value)?;
    let data = normalize_missing(record.field(&rule.field));
    let is_date = rule.data_type == Some(DataType::Date);

    let matched = match (operator, operand) {
        (Operator::Equals, Operand::Scalar(value)) => equals(data, value, rule.data_type),
        (Operator::NotEquals, Operand::Scalar(value)) => !equals(data, value, rule.data_type),

        (Operator::IsNull, _) => data.is_none(),
        (Operator::IsNotNull, _) => data.is_some(),
        (Operator::IsEmpty, _) => is_empty(data),
        (Operator::IsNotEmpty, _) => !is_empty(data),

        (Operator::GreaterThan, Operand::Scalar(value)) => {
            compare(data, value, is_date) == Some(Ordering::Greater)
        }
        (Operator::LessThan, Operand::Scalar(value)) => {
            compare(data, value, is_date) == Some(Ordering::Less)
        }
        (Operator::GreaterOrEqual, Operand::Scalar(value)) => matches!(
            compare(data, value, is_date),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        (Operator::LessOrEqual, Operand::Scalar(value)) => matches!(
            compare(data, value, is_date),
            Some(Ordering::Less | Ordering::Equal)
        ),

        (Operator::Between, Operand::Range(low, high)) => {
            within(data, low, high, is_date).unwrap_or(false)
        }
        (Operator::NotBetween, Operand::Range(low, high)) => {
            within(data, low, high, is_date).is_some_and(|inside| !inside)
        }

        (Operator::Before, Operand::Scalar(value)) => {
            compare(data, value, true) == Some(Ordering::Less)
        }
        (Operator::After, Operand::Scalar(value)) => {
            compare(data, value, true) == Some(Ordering::Greater)
        }

        (Operator::IsTrue, _) => data.and_then(as_bool) == Some(true),
        (Operator::IsFalse, _) => data.and_then(as_bool) == Some(false),

        (Operator::Contains, Operand::Scalar(value)) => {
            any_text(data, value, |text, needle| text.contains(needle))
        }
        (Operator::NotContains, Operand::Scalar(value)) => {
            !any_text(data, value, |text, needle| text.contains(needle))
        }
        (Operator::StartsWith, Operand::Scalar(value)) => {
            any_text(data, value, |text, needle| text.starts_with(needle))
        }
        (Operator::EndsWith, Operand::Scalar(value)) => {
            any_text(data, value, |text, needle| text.ends_with(needle))
        }

        (Operator::Regex, Operand::Scalar(value)) => matches_pattern(data, value, patterns)?,
        (Operator::NotRegex, Operand::Scalar(value)) => {
            !matches_pattern(data, value, patterns)?
        }

        (Operator::In, Operand::List(items)) => in_list(data, items),
        (Operator::NotIn, Operand::List(items)) => !in_list(data, items),

        (Operator::ArrayContains, Operand::Scalar(value)) => {
            as_list(data).is_some_and(|values| values.iter().any(|v| same_value(v, value)))
        }
        (Operator::ContainsAny, Operand::List(items)) => as_list(data).is_some_and(|values| {
            items
                .iter()
                .any(|item| values.iter().any(|v| same_value(v, item)))
        }),
        (Operator::ContainsAll, Operand::List(items)) => as_list(data).is_some_and(|values| {
            items
                .iter()
                .all(|item| values.iter().any(|v| same_value(v, item)))
        }),
        (Operator::LengthEquals, Operand::Scalar(value)) => {
            list_length_cmp(data, value) == Some(Ordering::Equal)
        }
        (Operator::LengthGreater, Operand::Scalar(value)) => {
            list_length_cmp(data, value) == Some(Ordering::Greater)
        }
        (Operator::LengthLess, Operand::Scalar(value)) => {
            list_length_cmp(data, value) == Some(Ordering::Less)
        }

        // Operand::narrow guarantees the shape for every operator above.
        (operator, _) => {
            return Err(FilterError::MalformedValue {
                operator,
                expected: "an operand matching the operator",
            })
        }
    };

    trace!(
        "Rule '{} {} {}' => {}",
        rule.field,
        rule.operator,
        rule.value,
        matched
    );
    Ok(matched)
}

fn equals(data: Option<&Value>, value: &Value, data_type: Option<DataType>) -> bool {
    let Some(data) = data else {
        return false;
    };
    if let Value::Array(values) = data {
        return values.iter().any(|v| same_value(v, value));
    }
    if data_type == Some(DataType::Date) {
        return as_timestamp(data)
            .zip(as_timestamp(value))
            .is_some_and(|(a, b)| a == b);
    }
    if value.is_boolean() || data_type == Some(DataType::Boolean) {
        return as_bool(data).zip(as_bool(value)).is_some_and(|(a, b)| a == b);
    }
    if let Some(expected) = as_number(value) {
        return as_number(data) == Some(expected);
    }
    match (data, value) {
        (Value::String(a), Value::String(b)) => a == b,
        _ => data == value,
    }
}

fn is_empty(data: Option<&Value>) -> bool {
    match data {
        None => true,
        Some(Value::Array(values)) => values.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn compare(data: Option<&Value>, value: &Value, is_date: bool) -> Option<Ordering> {
    let data = data?;
    if is_date {
        as_timestamp(data)?.partial_cmp(&as_timestamp(value)?)
    } else {
        as_number(data)?.partial_cmp(&as_number(value)?)
    }
}

// None when data or either bound cannot be compared.
fn within(data: Option<&Value>, low: &Value, high: &Value, is_date: bool) -> Option<bool> {
    let above_low = compare(data, low, is_date)? != Ordering::Less;
    let below_high = compare(data, high, is_date)? != Ordering::Greater;
    Some(above_low && below_high)
}

fn any_text(data: Option<&Value>, value: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    let needle = as_text(Some(value)).to_lowercase();
    match data {
        Some(Value::Array(values)) => values
            .iter()
            .any(|v| test(&as_text(Some(v)).to_lowercase(), &needle)),
        _ => test(&as_text(data).to_lowercase(), &needle),
    }
}

fn matches_pattern(
    data: Option<&Value>,
    value: &Value,
    patterns: &PatternCache,
) -> Result<bool, FilterError> {
    let pattern = patterns.get(&as_text(Some(value)))?;
    Ok(match data {
        Some(Value::Array(values)) => values.iter().any(|v| pattern.is_match(&as_text(Some(v)))),
        _ => pattern.is_match(&as_text(data)),
    })
}

fn in_list(data: Option<&Value>, items: &[Value]) -> bool {
    match data {
        None => false,
        Some(Value::Array(values)) => values
            .iter()
            .any(|v| items.iter().any(|item| same_value(v, item))),
        Some(data) => match as_number(data) {
            Some(n) => items.iter().filter_map(as_number).any(|item| item == n),
            None => items.iter().any(|item| same_value(data, item)),
        },
    }
}

fn as_list(data: Option<&Value>) -> Option<&Vec<Value>> {
    data.and_then(Value::as_array)
}

fn list_length_cmp(data: Option<&Value>, value: &Value) -> Option<Ordering> {
    let len = as_list(data)?.len() as f64;
    len.partial_cmp(&as_number(value)?)
}
