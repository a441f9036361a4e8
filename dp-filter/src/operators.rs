use crate::errors::FilterError;
use serde_json::Value;
use std::str::FromStr;
use strum_macros::EnumIter;

/// The full operator vocabulary understood by the evaluator.
///
/// Identifiers are the persisted strings stored in filter trees, so they must
/// not change. A handful of aliases from older trees are accepted on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Operator {
    Equals,
    NotEquals,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Between,
    NotBetween,
    Before,
    After,
    IsTrue,
    IsFalse,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Regex,
    NotRegex,
    In,
    NotIn,
    ArrayContains,
    ContainsAny,
    ContainsAll,
    LengthEquals,
    LengthGreater,
    LengthLess,
}

/// Shape of the operand an operator expects in a rule's `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    /// No operand, `value` is ignored.
    Unary,
    Scalar,
    /// Inclusive `[low, high]` pair.
    Range,
    List,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::IsTrue => "is_true",
            Operator::IsFalse => "is_false",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Regex => "regex",
            Operator::NotRegex => "not_regex",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::ArrayContains => "array_contains",
            Operator::ContainsAny => "contains_any",
            Operator::ContainsAll => "contains_all",
            Operator::LengthEquals => "length_equals",
            Operator::LengthGreater => "length_greater",
            Operator::LengthLess => "length_less",
        }
    }

    /// Human-readable label shown in summaries and operator pickers
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "Not Equals",
            Operator::IsNull => "Is Null",
            Operator::IsNotNull => "Is Not Null",
            Operator::IsEmpty => "Is Empty",
            Operator::IsNotEmpty => "Is Not Empty",
            Operator::GreaterThan => "Greater Than",
            Operator::LessThan => "Less Than",
            Operator::GreaterOrEqual => "Greater Than Or Equal",
            Operator::LessOrEqual => "Less Than Or Equal",
            Operator::Between => "Between",
            Operator::NotBetween => "Not Between",
            Operator::Before => "Before",
            Operator::After => "After",
            Operator::IsTrue => "Is True",
            Operator::IsFalse => "Is False",
            Operator::Contains => "Contains",
            Operator::NotContains => "Does Not Contain",
            Operator::StartsWith => "Starts With",
            Operator::EndsWith => "Ends With",
            Operator::Regex => "Matches Regex",
            Operator::NotRegex => "Does Not Match Regex",
            Operator::In => "In List",
            Operator::NotIn => "Not In List",
            Operator::ArrayContains => "Array Contains",
            Operator::ContainsAny => "Contains Any",
            Operator::ContainsAll => "Contains All",
            Operator::LengthEquals => "Length Equals",
            Operator::LengthGreater => "Length Greater Than",
            Operator::LengthLess => "Length Less Than",
        }
    }

    pub fn family(&self) -> OperatorFamily {
        match self {
            Operator::IsNull
            | Operator::IsNotNull
            | Operator::IsEmpty
            | Operator::IsNotEmpty
            | Operator::IsTrue
            | Operator::IsFalse => OperatorFamily::Unary,
            Operator::Between | Operator::NotBetween => OperatorFamily::Range,
            Operator::In | Operator::NotIn | Operator::ContainsAny | Operator::ContainsAll => {
                OperatorFamily::List
            }
            _ => OperatorFamily::Scalar,
        }
    }

    pub fn takes_value(&self) -> bool {
        self.family() != OperatorFamily::Unary
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Operator::Equals),
            "not_equals" => Ok(Operator::NotEquals),
            "is_null" => Ok(Operator::IsNull),
            "is_not_null" => Ok(Operator::IsNotNull),
            "is_empty" => Ok(Operator::IsEmpty),
            "is_not_empty" => Ok(Operator::IsNotEmpty),
            "greater_than" => Ok(Operator::GreaterThan),
            "less_than" => Ok(Operator::LessThan),
            "greater_or_equal" => Ok(Operator::GreaterOrEqual),
            "less_or_equal" => Ok(Operator::LessOrEqual),
            "between" => Ok(Operator::Between),
            "not_between" => Ok(Operator::NotBetween),
            "before" => Ok(Operator::Before),
            "after" => Ok(Operator::After),
            "is_true" => Ok(Operator::IsTrue),
            "is_false" => Ok(Operator::IsFalse),
            "contains" => Ok(Operator::Contains),
            "not_contains" => Ok(Operator::NotContains),
            "starts_with" => Ok(Operator::StartsWith),
            "ends_with" => Ok(Operator::EndsWith),
            "regex" => Ok(Operator::Regex),
            "not_regex" => Ok(Operator::NotRegex),
            "in" => Ok(Operator::In),
            "not_in" => Ok(Operator::NotIn),
            "array_contains" => Ok(Operator::ArrayContains),
            "contains_any" | "array_contains_any" => Ok(Operator::ContainsAny),
            "contains_all" | "array_contains_all" => Ok(Operator::ContainsAll),
            "length_equals" | "array_length_equals" => Ok(Operator::LengthEquals),
            "length_greater" | "array_length_greater" => Ok(Operator::LengthGreater),
            "length_less" | "array_length_less" => Ok(Operator::LengthLess),
            _ => Err(FilterError::UnknownOperator(s.to_string())),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label for a persisted operator identifier, falling back to the identifier
/// itself when it is not part of the vocabulary.
pub fn label_for(operator: &str) -> String {
    Operator::from_str(operator)
        .map(|op| op.label().to_string())
        .unwrap_or_else(|_| operator.to_string())
}

/// A rule's `value` narrowed to the shape its operator expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    None,
    Scalar(&'a Value),
    Range(&'a Value, &'a Value),
    List(&'a [Value]),
}

impl<'a> Operand<'a> {
    pub fn narrow(operator: Operator, value: &'a Value) -> Result<Self, FilterError> {
        match operator.family() {
            OperatorFamily::Unary => Ok(Operand::None),
            OperatorFamily::Scalar => Ok(Operand::Scalar(value)),
            OperatorFamily::Range => match value {
                Value::Array(bounds) if bounds.len() == 2 => {
                    Ok(Operand::Range(&bounds[0], &bounds[1]))
                }
                _ => Err(FilterError::MalformedValue {
                    operator,
                    expected: "a [low, high] pair",
                }),
            },
            OperatorFamily::List => match value {
                Value::Array(items) => Ok(Operand::List(items)),
                _ => Err(FilterError::MalformedValue {
                    operator,
                    expected: "a list of values",
                }),
            },
        }
    }
}
