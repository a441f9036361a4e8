use crate::operators::{label_for, Operand, Operator};
use crate::types::{DataType, FilterGroup, FilterNode, FilterRule};
use crate::validate::{is_complete_range, is_present};
use std::collections::BTreeMap;
use strsim::jaro_winkler;
use strum::IntoEnumIterator;

const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Which operators may be offered for each data type.
///
/// The default table is the one persisted filters are written against; it
/// can be overridden per data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRegistry {
    operators: BTreeMap<DataType, Vec<Operator>>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        use Operator::*;
        let mut operators = BTreeMap::new();
        operators.insert(
            DataType::String,
            vec![Equals, NotEquals, Contains, NotContains, StartsWith, EndsWith, In, NotIn],
        );
        operators.insert(
            DataType::Number,
            vec![
                Equals,
                NotEquals,
                GreaterThan,
                LessThan,
                GreaterOrEqual,
                LessOrEqual,
                Between,
                NotBetween,
            ],
        );
        operators.insert(
            DataType::Boolean,
            vec![IsTrue, IsFalse, Equals, NotEquals],
        );
        operators.insert(
            DataType::Date,
            vec![
                Equals,
                NotEquals,
                Between,
                NotBetween,
                Before,
                After,
                GreaterThan,
                LessThan,
                GreaterOrEqual,
                LessOrEqual,
            ],
        );
        operators.insert(
            DataType::Array,
            vec![Contains, NotContains, ContainsAny, ContainsAll],
        );
        Self { operators }
    }
}

impl OperatorRegistry {
    /// Registry with no data types registered
    pub fn empty() -> Self {
        Self {
            operators: BTreeMap::new(),
        }
    }

    /// Replace the operator list of one data type
    pub fn with_operators(mut self, data_type: DataType, operators: Vec<Operator>) -> Self {
        self.operators.insert(data_type, operators);
        self
    }

    pub fn operators_for(&self, data_type: DataType) -> &[Operator] {
        self.operators
            .get(&data_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Like [`Self::operators_for`], but an unknown data type name yields an
    /// empty list instead of an error.
    pub fn operators_for_name(&self, data_type: &str) -> &[Operator] {
        data_type
            .parse::<DataType>()
            .map(|dt| self.operators_for(dt))
            .unwrap_or(&[])
    }

    pub fn data_types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.operators.keys().copied()
    }

    /// Display label of a persisted operator identifier; see [`label_for`].
    pub fn label_for(&self, operator: &str) -> String {
        label_for(operator)
    }

    pub fn is_allowed(&self, data_type: DataType, operator: Operator) -> bool {
        self.operators_for(data_type).contains(&operator)
    }

    /// Operators of `data_type` whose label contains `term`, ignoring case.
    pub fn search(&self, data_type: DataType, term: &str) -> Vec<Operator> {
        let term = term.to_lowercase();
        self.operators_for(data_type)
            .iter()
            .copied()
            .filter(|op| term.is_empty() || op.label().to_lowercase().contains(&term))
            .collect()
    }

    /// All issues found in the tree, in depth-first order.
    pub fn check_group(&self, group: &FilterGroup) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.check_children(group, &mut Vec::new(), &mut issues);
        issues
    }

    fn check_children(
        &self,
        group: &FilterGroup,
        path: &mut Vec<usize>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for (index, child) in group.children.iter().enumerate() {
            path.push(index);
            match child {
                FilterNode::Rule(rule) => {
                    if let Some(kind) = self.check_rule(rule) {
                        issues.push(ValidationIssue {
                            path: path.clone(),
                            kind,
                        });
                    }
                }
                FilterNode::Group(nested) => self.check_children(nested, path, issues),
            }
            path.pop();
        }
    }

    /// First problem found with a single rule, if any.
    pub fn check_rule(&self, rule: &FilterRule) -> Option<IssueKind> {
        if rule.field.is_empty() {
            return Some(IssueKind::MissingField);
        }
        if rule.operator.is_empty() {
            return Some(IssueKind::MissingOperator);
        }
        let operator = match rule.operator.parse::<Operator>() {
            Ok(op) => op,
            Err(_) => {
                return Some(IssueKind::UnknownOperator {
                    operator: rule.operator.clone(),
                    suggestion: suggest_operator(&rule.operator),
                })
            }
        };
        if let Some(data_type) = rule.data_type {
            if !self.is_allowed(data_type, operator) {
                return Some(IssueKind::OperatorNotAllowed {
                    operator,
                    data_type,
                });
            }
        }
        match Operand::narrow(operator, &rule.value) {
            Err(_) => Some(IssueKind::MalformedValue { operator }),
            Ok(Operand::None) => None,
            Ok(Operand::Range(..)) if !is_complete_range(&rule.value) => {
                Some(IssueKind::MissingValue)
            }
            Ok(_) if rule.data_type == Some(DataType::Boolean) && !rule.value.is_boolean() => {
                Some(IssueKind::MissingValue)
            }
            Ok(_) if !is_present(&rule.value) => Some(IssueKind::MissingValue),
            Ok(_) => None,
        }
    }
}

fn suggest_operator(unknown: &str) -> Option<String> {
    Operator::iter()
        .map(|op| (op, jaro_winkler(unknown, op.as_str())))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(op, _)| op.as_str().to_string())
}

/// A problem with one rule, located by its child-index path from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub path: Vec<usize>,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    MissingField,
    MissingOperator,
    UnknownOperator {
        operator: String,
        suggestion: Option<String>,
    },
    OperatorNotAllowed {
        operator: Operator,
        data_type: DataType,
    },
    MalformedValue {
        operator: Operator,
    },
    MissingValue,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: ", self.path)?;
        match &self.kind {
            IssueKind::MissingField => write!(f, "field is not set"),
            IssueKind::MissingOperator => write!(f, "operator is not set"),
            IssueKind::UnknownOperator {
                operator,
                suggestion: Some(suggestion),
            } => write!(
                f,
                "unknown operator '{}', did you mean '{}'?",
                operator, suggestion
            ),
            IssueKind::UnknownOperator {
                operator,
                suggestion: None,
            } => write!(f, "unknown operator '{}'", operator),
            IssueKind::OperatorNotAllowed {
                operator,
                data_type,
            } => write!(
                f,
                "operator '{}' is not available for {} fields",
                operator, data_type
            ),
            IssueKind::MalformedValue { operator } => match operator.family() {
                crate::operators::OperatorFamily::Range => {
                    write!(f, "'{}' needs a [low, high] pair", operator)
                }
                _ => write!(f, "'{}' needs a list of values", operator),
            },
            IssueKind::MissingValue => write!(f, "value is missing"),
        }
    }
}
