use crate::argparse::OperatorsArgs;
use anyhow::Result;
use dp_filter::{DataType, OperatorRegistry};
use std::io::Write;
use tabular::{Row, Table};

#[allow(clippy::literal_string_with_formatting_args)]
pub fn handle_operators_command<W: Write>(
    args: OperatorsArgs,
    registry: &OperatorRegistry,
    out: &mut W,
) -> Result<()> {
    let data_types: Vec<DataType> = match args.data_type {
        Some(data_type) => vec![data_type],
        None => registry.data_types().collect(),
    };
    let term = args.search.unwrap_or_default();

    let mut table = Table::new("{:<}  {:<}  {:<}")
        .with_row(Row::from_cells(["Data type", "Operator", "Label"].iter().cloned()));
    let mut listed = 0;
    for data_type in data_types {
        for operator in registry.search(data_type, &term) {
            table.add_row(
                Row::new()
                    .with_cell(data_type)
                    .with_cell(operator.as_str())
                    .with_cell(operator.label()),
            );
            listed += 1;
        }
    }

    if listed == 0 {
        writeln!(out, "No operators found")?;
    } else {
        write!(out, "{}", table)?;
    }
    Ok(())
}
