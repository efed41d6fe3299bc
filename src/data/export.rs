use anyhow::{Context, Result};

use super::model::Table;

// ---------------------------------------------------------------------------
// CSV export of the displayed table
// ---------------------------------------------------------------------------

pub const CSV_MIME: &str = "text/csv";

/// Downloadable twin of a rendered table. Built fresh per request and
/// handed to the host; carries no identity across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize the table to CSV exactly as displayed: header row verbatim,
/// rows in order, UTF-8, no reordering or renaming.
pub fn encode_csv(table: &Table, file_name: &str) -> Result<ExportPayload> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .with_context(|| format!("writing CSV header for `{}`", table.name))?;
    for (i, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {i} of `{}`", table.name))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer for `{}`: {e}", table.name))?;

    Ok(ExportPayload {
        file_name: file_name.to_string(),
        mime: CSV_MIME,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{columns, Value};

    fn motives_table() -> Table {
        Table::new(
            "Motifs (genre)",
            vec![
                columns::MOTIF.to_string(),
                columns::HOMMES.to_string(),
                columns::FEMMES.to_string(),
            ],
            vec![
                vec![
                    Value::String("Travail".into()),
                    Value::Integer(9_800),
                    Value::Integer(4_200),
                ],
                vec![
                    Value::String("Études, formation".into()),
                    Value::Integer(3_600),
                    Value::Integer(3_100),
                ],
                vec![
                    Value::String("Regroupement familial".into()),
                    Value::Integer(2_400),
                    Value::Integer(5_900),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn payload_has_fixed_name_and_mime() {
        let payload = encode_csv(&motives_table(), "Donnéesmotifs_immigration.csv").unwrap();
        assert_eq!(payload.file_name, "Donnéesmotifs_immigration.csv");
        assert_eq!(payload.mime, "text/csv");
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let table = motives_table();
        let payload = encode_csv(&table, "out.csv").unwrap();

        let mut reader = csv::Reader::from_reader(payload.bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, table.columns);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows.len(), table.len());
        for (parsed, original) in rows.iter().zip(&table.rows) {
            let rendered: Vec<String> = original.iter().map(|v| v.to_string()).collect();
            assert_eq!(parsed, &rendered);
        }
    }

    #[test]
    fn quotes_cells_containing_commas() {
        let payload = encode_csv(&motives_table(), "out.csv").unwrap();
        let text = String::from_utf8(payload.bytes).unwrap();
        assert!(text.contains("\"Études, formation\""));
        // Apostrophes need no quoting.
        assert!(text.contains("Motif d'immigration,Hommes,Femmes"));
    }
}
