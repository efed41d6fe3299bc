use std::fmt;

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// Value – a single cell of a survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the workbook dtypes.
///
/// `Display` is the single formatting path: the table grid and the CSV
/// encoder both go through it, so what is shown is what is exported.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for chart axes and color scales.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – one survey sheet
// ---------------------------------------------------------------------------

/// A named table with a fixed, ordered set of columns.
///
/// Tables are immutable once built: filtering and reshaping always produce a
/// new `Table`, never mutate the stored one. Row order is meaningful (the
/// motive sheet encodes a domain ordering) and is preserved everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Ordered column headers, consumed verbatim from the source file.
    pub columns: Vec<String>,
    /// Each row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, enforcing that every row matches the header width.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let name = name.into();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "table `{name}`: row {i} has {} cells but {} columns",
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Table {
            name,
            columns,
            rows,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column header, if present.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// All cells of one column rendered as text (labels for a category axis).
    pub fn text_column(&self, column: &str) -> Result<Vec<String>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| anyhow::anyhow!("table `{}`: no column `{column}`", self.name))?;
        Ok(self.rows.iter().map(|row| row[idx].to_string()).collect())
    }

    /// All cells of one column as numbers (values for a value axis).
    pub fn numeric_column(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| anyhow::anyhow!("table `{}`: no column `{column}`", self.name))?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx].as_f64().ok_or_else(|| {
                    anyhow::anyhow!(
                        "table `{}`: non-numeric cell in column `{column}` at row {i}",
                        self.name
                    )
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SheetName – the six survey sheets
// ---------------------------------------------------------------------------

/// Column headers of the survey workbook, verbatim from the source file.
pub mod columns {
    pub const REGION_ORIGINE: &str = "Région d'origine";
    pub const NOMBRE_IMMIGRES: &str = "Nombre d'immigrés";
    pub const GROUPE_AGE: &str = "Groupe d'âge";
    pub const MOTIF: &str = "Motif d'immigration";
    pub const HOMMES: &str = "Hommes";
    pub const FEMMES: &str = "Femmes";
    pub const NIVEAU_INSTRUCTION: &str = "Niveau d'instruction";
    pub const TYPE_ACTIVITE: &str = "Type d'activité";
    pub const GOUVERNORAT: &str = "Gouvernorat";
    /// The capital `D` is in the source file's header row.
    pub const NOMBRE_IMMIGRES_GEO: &str = "Nombre D'immigrés";
}

/// The closed set of sheets the survey workbook must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetName {
    Origin,
    AgeStructure,
    MotivesByGender,
    Education,
    Activity,
    GeoDistribution,
}

impl SheetName {
    pub const ALL: [SheetName; 6] = [
        SheetName::Origin,
        SheetName::AgeStructure,
        SheetName::MotivesByGender,
        SheetName::Education,
        SheetName::Activity,
        SheetName::GeoDistribution,
    ];

    /// Sheet name inside the workbook, verbatim.
    pub fn sheet(self) -> &'static str {
        match self {
            SheetName::Origin => "Origine",
            SheetName::AgeStructure => "Structure par âge",
            SheetName::MotivesByGender => "Motifs (genre)",
            SheetName::Education => "Instruction",
            SheetName::Activity => "Activité",
            SheetName::GeoDistribution => "Répartition géographique",
        }
    }

    /// Columns the sheet must carry for its view to resolve.
    pub fn contract_columns(self) -> &'static [&'static str] {
        use columns::*;
        match self {
            SheetName::Origin => &[REGION_ORIGINE, NOMBRE_IMMIGRES],
            SheetName::AgeStructure => &[GROUPE_AGE, NOMBRE_IMMIGRES],
            SheetName::MotivesByGender => &[MOTIF, HOMMES, FEMMES],
            SheetName::Education => &[NIVEAU_INSTRUCTION, HOMMES, FEMMES],
            SheetName::Activity => &[TYPE_ACTIVITE, HOMMES, FEMMES],
            SheetName::GeoDistribution => &[GOUVERNORAT, NOMBRE_IMMIGRES_GEO],
        }
    }

    /// Whether `name` is one of the six expected workbook sheet names.
    pub fn is_expected(name: &str) -> bool {
        SheetName::ALL.iter().any(|s| s.sheet() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_table() -> Table {
        Table::new(
            "Origine",
            vec![
                columns::REGION_ORIGINE.to_string(),
                columns::NOMBRE_IMMIGRES.to_string(),
            ],
            vec![
                vec![Value::String("Libye".into()), Value::Integer(20_400)],
                vec![Value::String("Syrie".into()), Value::Integer(8_750)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn display_is_csv_friendly() {
        assert_eq!(Value::String("Béja".into()).to_string(), "Béja");
        assert_eq!(Value::Integer(2480).to_string(), "2480");
        assert_eq!(Value::Float(33.5).to_string(), "33.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(
            "bad",
            vec!["a".into(), "b".into()],
            vec![vec![Value::Integer(1)]],
        );
        assert!(err.is_err());
    }

    #[test]
    fn columns_extract_in_row_order() {
        let t = two_column_table();
        assert_eq!(
            t.text_column(columns::REGION_ORIGINE).unwrap(),
            vec!["Libye", "Syrie"]
        );
        assert_eq!(
            t.numeric_column(columns::NOMBRE_IMMIGRES).unwrap(),
            vec![20_400.0, 8_750.0]
        );
    }

    #[test]
    fn numeric_column_rejects_text_cells() {
        let t = two_column_table();
        assert!(t.numeric_column(columns::REGION_ORIGINE).is_err());
        assert!(t.numeric_column("absente").is_err());
    }

    #[test]
    fn expected_sheet_names_are_the_french_ones() {
        assert!(SheetName::is_expected("Origine"));
        assert!(SheetName::is_expected("Répartition géographique"));
        assert!(!SheetName::is_expected("Origin"));
        assert!(!SheetName::is_expected("Feuille1"));
    }
}
