use std::collections::BTreeMap;
use std::path::Path;

use super::loader;
use super::model::{SheetName, Table};
use super::DataError;

// ---------------------------------------------------------------------------
// DatasetStore – the six survey tables, loaded once
// ---------------------------------------------------------------------------

/// Holds the survey tables for the process lifetime.
///
/// Loaded once, never mutated afterwards; consumers get read-only views and
/// any "filtering" builds a new derived table. The store is owned explicitly
/// by the application state rather than hidden in a module-level cache, so
/// tests can build fresh stores from fixture tables.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    tables: BTreeMap<String, Table>,
}

impl DatasetStore {
    /// Read the workbook and verify the survey contract: all six sheets
    /// present, each with its contract columns. Any miss is fatal – the
    /// dashboard shows its error state instead of partial data.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let tables = loader::load_workbook(path).map_err(DataError::load)?;
        let store = DatasetStore { tables };
        store.check_contract()?;
        Ok(store)
    }

    /// Build a store from in-memory tables. No contract check: test
    /// fixtures are allowed to be partial.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        DatasetStore {
            tables: tables
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
        }
    }

    fn check_contract(&self) -> Result<(), DataError> {
        for sheet in SheetName::ALL {
            let table = self
                .tables
                .get(sheet.sheet())
                .ok_or_else(|| DataError::Load {
                    reason: format!("workbook is missing sheet `{}`", sheet.sheet()),
                })?;
            for column in sheet.contract_columns() {
                if table.column_index(column).is_none() {
                    return Err(DataError::Load {
                        reason: format!(
                            "sheet `{}` is missing column `{column}`",
                            sheet.sheet()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fetch a table by workbook sheet name.
    ///
    /// Names outside the six expected sheets fail with
    /// [`DataError::UnknownTable`] – a partial or empty table is never
    /// returned silently.
    pub fn get(&self, name: &str) -> Result<&Table, DataError> {
        if !SheetName::is_expected(name) {
            return Err(DataError::UnknownTable {
                name: name.to_string(),
            });
        }
        self.tables.get(name).ok_or_else(|| DataError::UnknownTable {
            name: name.to_string(),
        })
    }

    /// Number of loaded tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the store holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
