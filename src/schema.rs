//! Curated table schema and catalog registration statements.
//!
//! The table stores `category`, `sales` and `date` in the data files and
//! carries `year` and `month` as Hive-style partition columns. The DDL here
//! registers that layout in a SQL catalog (Glue/Hive/Athena dialect).

use crate::config::CatalogConfig;
use crate::constants::columns;
use polars::prelude::*;

/// Polars schema of the columns stored in each partition file
pub fn partition_file_schema() -> Schema {
    Schema::from_iter(vec![
        Field::new(columns::CATEGORY.into(), DataType::String),
        Field::new(columns::SALES.into(), DataType::Float64),
        Field::new(columns::DATE.into(), DataType::String),
    ])
}

/// Catalog description of the curated table
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub database: String,
    pub table: String,
    pub location: String,
}

impl TableSchema {
    pub fn new(catalog: &CatalogConfig, location: impl Into<String>) -> Self {
        Self {
            database: catalog.database.clone(),
            table: catalog.table.clone(),
            location: location.into(),
        }
    }

    /// Fully qualified `database.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    /// Data columns with their SQL types, in file order
    pub fn data_columns() -> [(&'static str, &'static str); 3] {
        [
            (columns::CATEGORY, "STRING"),
            (columns::SALES, "DOUBLE"),
            (columns::DATE, "STRING"),
        ]
    }

    /// Partition columns with their SQL types, in directory order
    pub fn partition_columns() -> [(&'static str, &'static str); 2] {
        [(columns::YEAR, "INT"), (columns::MONTH, "INT")]
    }

    pub fn create_database_sql(&self) -> String {
        format!("CREATE DATABASE IF NOT EXISTS {};", self.database)
    }

    pub fn create_table_sql(&self) -> String {
        let render = |cols: &[(&str, &str)]| {
            cols.iter()
                .map(|(name, ty)| format!("    {} {}", name, ty))
                .collect::<Vec<_>>()
                .join(",\n")
        };

        format!(
            "CREATE EXTERNAL TABLE IF NOT EXISTS {} (\n{}\n)\nPARTITIONED BY (\n{}\n)\nSTORED AS PARQUET\nLOCATION '{}';",
            self.qualified_name(),
            render(&Self::data_columns()),
            render(&Self::partition_columns()),
            self.location
        )
    }

    /// Picks up partition directories written since the last registration
    pub fn repair_partitions_sql(&self) -> String {
        format!("MSCK REPAIR TABLE {};", self.qualified_name())
    }

    /// All registration statements, separated by blank lines
    pub fn ddl(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}\n",
            self.create_database_sql(),
            self.create_table_sql(),
            self.repair_partitions_sql()
        )
    }
}
