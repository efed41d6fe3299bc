use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use serde_json::Value as JsonValue;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey workbook from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` – spreadsheet workbook, one survey topic per sheet
/// * `.json`           – `{ "<sheet>": { "columns": [...], "data": [[...]] } }`,
///   the column-ordered `df.to_json(orient="split")` shape per sheet
///
/// Every sheet found in the file is returned; the store decides afterwards
/// whether the six expected ones are all present.
pub fn load_workbook(path: &Path) -> Result<BTreeMap<String, Table>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" => load_xlsx(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Each worksheet: header row with column names, then one record per row.
/// Whole-valued floats collapse to integers so counts stay counts.
fn load_xlsx(path: &Path) -> Result<BTreeMap<String, Table>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context("opening workbook")?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut tables = BTreeMap::new();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("reading worksheet `{name}`"))?;
        let table = range_to_table(&name, &range)?;
        tables.insert(name, table);
    }
    Ok(tables)
}

fn range_to_table(name: &str, range: &calamine::Range<Data>) -> Result<Table> {
    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .with_context(|| format!("worksheet `{name}` is empty"))?;
    let columns: Vec<String> = header.iter().map(cell_to_header).collect();

    let mut rows = Vec::new();
    for cells in rows_iter {
        // The used range can trail off into blank rows; skip them.
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let row: Vec<Value> = (0..columns.len())
            .map(|i| cell_to_value(cells.get(i).unwrap_or(&Data::Empty)))
            .collect();
        rows.push(row);
    }

    Table::new(name, columns, rows)
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => float_to_value(*f),
        Data::Bool(b) => Value::String(b.to_string()),
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

/// Spreadsheets store every number as a double; fold whole values back into
/// integers so a count of 2480 does not display or export as 2480.0.
fn float_to_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::Integer(f as i64)
    } else {
        Value::Float(f)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (one `orient="split"`-shaped object per sheet):
///
/// ```json
/// {
///   "Origine": {
///     "columns": ["Région d'origine", "Nombre d'immigrés"],
///     "data": [["Libye", 20400], ["Syrie", 8750]]
///   },
///   ...
/// }
/// ```
///
/// The explicit `columns` array is what keeps column order a contract; a
/// records-oriented object would lose it.
fn load_json(path: &Path) -> Result<BTreeMap<String, Table>> {
    let text = std::fs::read_to_string(path).context("reading JSON workbook")?;
    parse_workbook_json(&text)
}

pub(crate) fn parse_workbook_json(text: &str) -> Result<BTreeMap<String, Table>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON workbook")?;
    let sheets = root
        .as_object()
        .context("expected a top-level JSON object mapping sheet names to sheets")?;

    let mut tables = BTreeMap::new();
    for (name, sheet) in sheets {
        let table = json_sheet_to_table(name, sheet).with_context(|| format!("sheet `{name}`"))?;
        tables.insert(name.clone(), table);
    }
    Ok(tables)
}

fn json_sheet_to_table(name: &str, sheet: &JsonValue) -> Result<Table> {
    let obj = sheet
        .as_object()
        .context("expected an object with `columns` and `data`")?;

    let columns: Vec<String> = obj
        .get("columns")
        .and_then(JsonValue::as_array)
        .context("missing `columns` array")?
        .iter()
        .map(|c| {
            c.as_str()
                .map(str::to_string)
                .context("column names must be strings")
        })
        .collect::<Result<_>>()?;

    let data = obj
        .get("data")
        .and_then(JsonValue::as_array)
        .context("missing `data` array")?;

    let mut rows = Vec::with_capacity(data.len());
    for (i, row) in data.iter().enumerate() {
        let cells = row
            .as_array()
            .with_context(|| format!("row {i} is not an array"))?;
        rows.push(cells.iter().map(json_to_value).collect());
    }

    Table::new(name, columns, rows)
}

fn json_to_value(v: &JsonValue) -> Value {
    match v {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::String(b.to_string()),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}
