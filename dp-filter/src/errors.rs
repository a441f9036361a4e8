use crate::operators::Operator;

/// Error types for filter parsing, evaluation and editing
#[derive(Debug)]
pub enum FilterError {
    UnknownOperator(String),
    UnknownDataType(String),
    UnknownCondition(String),
    MalformedValue {
        operator: Operator,
        expected: &'static str,
    },
    InvalidPattern(String),
    RootNotAGroup,
    PathNotFound(Vec<usize>),
    NotAGroup(Vec<usize>),
    NotARule(usize),
    IndexOutOfBounds { index: usize, len: usize },
    SerdeJsonError(serde_json::Error),
    SerdeYamlError(serde_yaml_ng::Error),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::SerdeJsonError(err)
    }
}

impl From<serde_yaml_ng::Error> for FilterError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        FilterError::SerdeYamlError(err)
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::UnknownOperator(op) => write!(f, "Unknown operator: {}", op),
            FilterError::UnknownDataType(name) => write!(f, "Unknown data type: {}", name),
            FilterError::UnknownCondition(name) => {
                write!(f, "Unknown group condition: {} (expected AND or OR)", name)
            }
            FilterError::MalformedValue { operator, expected } => {
                write!(f, "Malformed value for '{}': expected {}", operator, expected)
            }
            FilterError::InvalidPattern(msg) => write!(f, "Invalid regex pattern: {}", msg),
            FilterError::RootNotAGroup => write!(f, "Filter root must be a group"),
            FilterError::PathNotFound(path) => write!(f, "No child at path {:?}", path),
            FilterError::NotAGroup(path) => write!(f, "Child at path {:?} is not a group", path),
            FilterError::NotARule(index) => write!(f, "Child at index {} is not a rule", index),
            FilterError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for group with {} children", index, len)
            }
            FilterError::SerdeJsonError(err) => write!(f, "Serde JSON error: {}", err),
            FilterError::SerdeYamlError(err) => write!(f, "Serde YAML error: {}", err),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::SerdeJsonError(err) => Some(err),
            FilterError::SerdeYamlError(err) => Some(err),
            _ => None,
        }
    }
}
