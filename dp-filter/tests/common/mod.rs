//! Shared fixtures for the dp-filter integration tests

#![allow(dead_code)]

use dp_filter::{DataType, FilterGroup, FilterNode, FilterRule};
use serde_json::{json, Value};

/// A persisted tree in the shape the portal stores applied filters in
pub const SAVED_FILTER_JSON: &str = r#"{
  "type": "group",
  "condition": "AND",
  "children": [
    {
      "type": "rule",
      "field": "qual",
      "operator": "greater_or_equal",
      "dataType": "number",
      "value": 30
    },
    {
      "type": "group",
      "condition": "OR",
      "children": [
        {
          "type": "rule",
          "field": "clinSig",
          "operator": "contains",
          "dataType": "string",
          "value": "pathogenic"
        },
        {
          "condition": "OR",
          "type": "rule",
          "field": "gnomadAf",
          "operator": "less_than",
          "dataType": "number",
          "value": "0.001"
        }
      ]
    },
    {
      "type": "rule",
      "field": "zygosity",
      "operator": "in",
      "dataType": "string",
      "value": ["het", "hom"]
    }
  ]
}"#;

/// Variant rows as produced by the clinical annotation pipeline
pub fn variant_records() -> Vec<Value> {
    vec![
        json!({"id": "v1", "qual": 55, "clinSig": "Pathogenic", "gnomadAf": ".", "zygosity": "het"}),
        json!({"id": "v2", "qual": 12, "clinSig": "Pathogenic", "gnomadAf": "0.0001", "zygosity": "het"}),
        json!({"id": "v3", "qual": "40", "clinSig": "Benign", "gnomadAf": "0.0004", "zygosity": "hom"}),
        json!({"id": "v4", "qual": 99, "clinSig": "Likely_benign", "gnomadAf": "0.2", "zygosity": "hom"}),
        json!({"id": "v5", "qual": 80, "clinSig": ".", "gnomadAf": "0.00001", "zygosity": "."}),
    ]
}

pub fn rule(field: &str, operator: &str, data_type: DataType, value: Value) -> FilterRule {
    FilterRule::new(field, operator, data_type, value)
}

pub fn node(field: &str, operator: &str, data_type: DataType, value: Value) -> FilterNode {
    rule(field, operator, data_type, value).into()
}

pub fn saved_filter() -> FilterGroup {
    FilterGroup::from_json(SAVED_FILTER_JSON).expect("Failed to parse saved filter")
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
