//! Loading filter trees and candidate records from files.

use crate::CliError;
use anyhow::{Context, Result};
use dp_filter::FilterGroup;
use serde_json::{Map, Value};
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Read a persisted filter tree; `.yaml`/`.yml` files are YAML, anything
/// else is parsed as JSON.
pub fn load_filter(path: &Path) -> Result<FilterGroup> {
    let raw = fs_err::read_to_string(path)?;
    let filter = match extension(path).as_str() {
        "yaml" | "yml" => FilterGroup::from_yaml(&raw),
        _ => FilterGroup::from_json(&raw),
    };
    filter.with_context(|| format!("Failed to parse filter from {}", path.display()))
}

/// Read records as JSON objects. Delimited files keep every cell as a string;
/// the evaluator coerces numbers and dates when comparing.
pub fn load_records(path: &Path, delimiter: Option<char>) -> Result<Vec<Value>> {
    let raw = fs_err::read_to_string(path)?;
    match extension(path).as_str() {
        "json" => {
            let doc: Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse JSON records from {}", path.display()))?;
            Ok(into_records(doc))
        }
        "jsonl" | "ndjson" => raw
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!("Invalid JSON on line {} of {}", index + 1, path.display())
                })
            })
            .collect(),
        "yaml" | "yml" => {
            let yaml_value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&raw)
                .with_context(|| format!("Failed to parse YAML records from {}", path.display()))?;
            let doc = serde_json::to_value(yaml_value)
                .context("Failed to convert YAML records to JSON values")?;
            Ok(into_records(doc))
        }
        "csv" => parse_delimited(&raw, delimiter.unwrap_or(',')),
        "tsv" | "tab" => parse_delimited(&raw, delimiter.unwrap_or('\t')),
        _ => Err(CliError::UnsupportedFormat(path.to_path_buf()).into()),
    }
}

fn into_records(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn parse_delimited(raw: &str, delimiter: char) -> Result<Vec<Value>> {
    let delimiter = u8::try_from(delimiter).context("Delimiter must be a single-byte character")?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(raw.as_bytes());
    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|row| -> Result<Value> {
            let row = row?;
            let record: Map<String, Value> = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
                .collect();
            Ok(Value::Object(record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_json_array_and_single_object() {
        let file = write_temp(".json", r#"[{"a": 1}, {"a": 2}]"#);
        assert_eq!(load_records(file.path(), None).unwrap().len(), 2);
        let file = write_temp(".json", r#"{"a": 1}"#);
        assert_eq!(load_records(file.path(), None).unwrap(), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let file = write_temp(".jsonl", "{\"a\": 1}\n\n{\"a\": 2}\n");
        assert_eq!(load_records(file.path(), None).unwrap().len(), 2);
        let file = write_temp(".ndjson", "{\"a\": 1}\n{oops\n");
        let err = load_records(file.path(), None).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_yaml_records() {
        let file = write_temp(".yaml", "- gene: TP53\n  qual: 40\n- gene: BRCA1\n  qual: 12\n");
        let records = load_records(file.path(), None).unwrap();
        assert_eq!(records[1], json!({"gene": "BRCA1", "qual": 12}));
    }

    #[test]
    fn test_tsv_cells_are_strings() {
        let file = write_temp(".tsv", "chrom\tpos\tgnomad_af\nchr1\t12345\t.\n");
        let records = load_records(file.path(), None).unwrap();
        assert_eq!(
            records,
            vec![json!({"chrom": "chr1", "pos": "12345", "gnomad_af": "."})]
        );
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let file = write_temp(".csv", "gene;qual\nTP53;40\n");
        let records = load_records(file.path(), Some(';')).unwrap();
        assert_eq!(records, vec![json!({"gene": "TP53", "qual": "40"})]);
        assert!(load_records(file.path(), Some('é')).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".parquet", "");
        let err = load_records(file.path(), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_filter_yaml_and_json() {
        let yaml = write_temp(
            ".yml",
            "type: group\ncondition: OR\nchildren:\n  - type: rule\n    field: gene\n    operator: equals\n    dataType: string\n    value: TP53\n",
        );
        let from_yaml = load_filter(yaml.path()).unwrap();
        let json = write_temp(".json", &from_yaml.to_json().unwrap());
        assert_eq!(load_filter(json.path()).unwrap(), from_yaml);

        let broken = write_temp(".json", "{");
        let err = load_filter(broken.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse filter"));
    }
}
