use anyhow::{Context, Result};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Wide-to-long reshape
// ---------------------------------------------------------------------------

/// Melt a wide table into long form: one output row per (id row, value
/// column) pair, with columns `[id_column, var_name, value_name]`.
///
/// Output is column-major to match `DataFrame.melt`: every row of the first
/// value column comes first, then every row of the next, in the wide
/// table's column order. Within a block, source row order is preserved.
pub fn melt(table: &Table, id_column: &str, var_name: &str, value_name: &str) -> Result<Table> {
    let id_idx = table
        .column_index(id_column)
        .with_context(|| format!("table `{}`: no id column `{id_column}`", table.name))?;

    let value_columns: Vec<(usize, &String)> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_idx)
        .collect();

    let mut rows = Vec::with_capacity(table.len() * value_columns.len());
    for (col_idx, col_name) in &value_columns {
        for row in &table.rows {
            rows.push(vec![
                row[id_idx].clone(),
                Value::String((*col_name).clone()),
                row[*col_idx].clone(),
            ]);
        }
    }

    Table::new(
        table.name.clone(),
        vec![
            id_column.to_string(),
            var_name.to_string(),
            value_name.to_string(),
        ],
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::columns;

    fn education_wide() -> Table {
        Table::new(
            "Instruction",
            vec![
                columns::NIVEAU_INSTRUCTION.to_string(),
                columns::HOMMES.to_string(),
                columns::FEMMES.to_string(),
            ],
            vec![
                vec![
                    Value::String("Aucun niveau".into()),
                    Value::Float(12.0),
                    Value::Float(18.5),
                ],
                vec![
                    Value::String("Primaire".into()),
                    Value::Float(28.0),
                    Value::Float(25.5),
                ],
                vec![
                    Value::String("Secondaire".into()),
                    Value::Float(35.0),
                    Value::Float(31.0),
                ],
                vec![
                    Value::String("Supérieur".into()),
                    Value::Float(25.0),
                    Value::Float(25.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn melts_column_major() {
        let long = melt(
            &education_wide(),
            columns::NIVEAU_INSTRUCTION,
            "Sexe",
            "Proportion",
        )
        .unwrap();

        assert_eq!(
            long.columns,
            vec![columns::NIVEAU_INSTRUCTION, "Sexe", "Proportion"]
        );
        assert_eq!(long.len(), 8);

        // First block is every Hommes row, second every Femmes row.
        let sexes = long.text_column("Sexe").unwrap();
        assert_eq!(&sexes[..4], ["Hommes", "Hommes", "Hommes", "Hommes"]);
        assert_eq!(&sexes[4..], ["Femmes", "Femmes", "Femmes", "Femmes"]);

        // Within a block, source row order holds.
        let levels = long.text_column(columns::NIVEAU_INSTRUCTION).unwrap();
        assert_eq!(
            &levels[..4],
            ["Aucun niveau", "Primaire", "Secondaire", "Supérieur"]
        );
        assert_eq!(&levels[..4], &levels[4..]);

        let values = long.numeric_column("Proportion").unwrap();
        assert_eq!(values[0], 12.0);
        assert_eq!(values[4], 18.5);
    }

    #[test]
    fn missing_id_column_is_an_error() {
        assert!(melt(&education_wide(), "Niveau", "Sexe", "Proportion").is_err());
    }
}
