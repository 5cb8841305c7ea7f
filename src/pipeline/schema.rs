//! Dataset schema: column names and their roles

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::LoadError;

/// Role a column plays in the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Identifier,
    Measurement,
    Label,
}

/// Named columns with identifier and label roles.
///
/// Columns are looked up by name. Schema order only matters for files without
/// a header row, where it supplies the column names, and for the order of the
/// feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub id_column: String,
    pub measurement_columns: Vec<String>,
    pub label_column: String,
}

impl Default for DatasetSchema {
    /// Wisconsin breast-cancer layout: id, nine cytology measurements, class.
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            measurement_columns: [
                "clump_thickness",
                "uniformity_cell_size",
                "uniformity_cell_shape",
                "marginal_adhesion",
                "single_epithelial_cell_size",
                "bare_nuclei",
                "bland_chromatin",
                "normal_nucleoli",
                "mitoses",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            label_column: "class".to_string(),
        }
    }
}

impl DatasetSchema {
    /// Load a schema from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::InvalidSchema {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let schema: DatasetSchema =
            serde_json::from_str(&text).map_err(|e| LoadError::InvalidSchema {
                message: format!("{}: {}", path.display(), e),
            })?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reject empty or duplicated column names
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.measurement_columns.is_empty() {
            return Err(LoadError::InvalidSchema {
                message: "at least one measurement column is required".to_string(),
            });
        }
        let names = self.column_names();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(LoadError::InvalidSchema {
                    message: format!("column {} has an empty name", i),
                });
            }
            if names[..i].contains(name) {
                return Err(LoadError::InvalidSchema {
                    message: format!("column '{}' appears more than once", name),
                });
            }
        }
        Ok(())
    }

    /// All column names in file order: identifier, measurements, label
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        names.push(self.id_column.clone());
        names.extend(self.measurement_columns.iter().cloned());
        names.push(self.label_column.clone());
        names
    }

    /// Total number of columns
    pub fn width(&self) -> usize {
        self.measurement_columns.len() + 2
    }

    /// Role of a named column, if it belongs to the schema
    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        if column == self.id_column {
            Some(ColumnRole::Identifier)
        } else if column == self.label_column {
            Some(ColumnRole::Label)
        } else if self.measurement_columns.iter().any(|c| c == column) {
            Some(ColumnRole::Measurement)
        } else {
            None
        }
    }
}
