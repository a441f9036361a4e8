//! Boolean filter trees for portal result tables.
//!
//! A [`FilterGroup`] combines [`FilterRule`]s and nested groups with AND/OR.
//! Trees are evaluated against records ([`evaluate_group`]), checked for
//! completeness ([`is_valid_group`]) and rendered for display
//! ([`summarize`]). Evaluation never fails: malformed or unknown rules simply
//! do not match.

pub mod coerce;
pub mod edit;
pub mod errors;
pub mod evaluate;
pub mod operators;
pub mod record;
pub mod registry;
pub mod summary;
pub mod types;
pub mod validate;

pub use edit::{list_value_from_input, FieldConfig};
pub use errors::FilterError;
pub use evaluate::{evaluate_group, evaluate_node, evaluate_rule, filter_records, try_evaluate_rule};
pub use operators::{label_for, Operand, Operator, OperatorFamily};
pub use record::Record;
pub use registry::{IssueKind, OperatorRegistry, ValidationIssue};
pub use summary::{describe_rule, summarize};
pub use types::{Condition, DataType, FilterGroup, FilterNode, FilterRule};
pub use validate::{is_valid_group, is_valid_rule};
