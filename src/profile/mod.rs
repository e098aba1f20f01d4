// src/profile/mod.rs
//! # Profile Assembler
//! Merges sparse per-customer feature records into one dense table.
//!
//! Built in two passes: first the column universe is discovered across all
//! customers, then every row is materialised with one cell per column. Cells
//! of zero-fillable groups default to `0`; gender and `Population` cells stay
//! absent (`None`) so "unknown" never reads as "no".

pub mod snapshot;

use crate::features::{CustomerFeatures, FeatureGroup, POPULATION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// Header of the identifier column in exports.
pub const CUSTOMER_ID_COLUMN: &str = "CustomerID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileColumn {
    pub name: String,
    pub group: FeatureGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub customer_id: String,
    /// One cell per column, same order as [`ProfileTable::columns`].
    pub values: Vec<Option<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTable {
    /// Sorted by name.
    columns: Vec<ProfileColumn>,
    rows: Vec<ProfileRow>,
}

impl ProfileTable {
    /// Assemble the dense table. Rows follow the input order.
    pub fn assemble(customers: &[CustomerFeatures]) -> Self {
        // pass 1: column universe
        let mut catalog: BTreeMap<&str, FeatureGroup> = BTreeMap::new();
        for c in customers {
            for (name, f) in c.iter() {
                catalog.entry(name).or_insert(f.group);
            }
        }
        let columns: Vec<ProfileColumn> = catalog
            .into_iter()
            .map(|(name, group)| ProfileColumn {
                name: name.to_string(),
                group,
            })
            .collect();

        // pass 2: materialise
        let rows = customers
            .iter()
            .map(|c| ProfileRow {
                customer_id: c.customer_id.clone(),
                values: columns
                    .iter()
                    .map(|col| {
                        c.get(&col.name)
                            .or_else(|| col.group.is_zero_fillable().then_some(0))
                    })
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[ProfileColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Feature columns, not counting the identifier.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
    }

    pub fn row(&self, customer_id: &str) -> Option<&ProfileRow> {
        self.rows.iter().find(|r| r.customer_id == customer_id)
    }

    /// Cell lookup. `None` when the customer or column is unknown, or the
    /// cell is structurally absent.
    pub fn value(&self, customer_id: &str, column: &str) -> Option<u32> {
        let i = self.column_index(column)?;
        self.row(customer_id)?.values[i]
    }

    pub fn label_of(&self, row: &ProfileRow) -> Option<u32> {
        let i = self.column_index(POPULATION)?;
        row.values[i]
    }

    /// Rows usable for supervised training: those carrying a population label.
    pub fn labelled_rows(&self) -> impl Iterator<Item = (&ProfileRow, u32)> + '_ {
        self.rows
            .iter()
            .filter_map(move |r| self.label_of(r).map(|l| (r, l)))
    }

    /// Columns that are model inputs (everything but the label).
    pub fn feature_columns(&self) -> impl Iterator<Item = &ProfileColumn> + '_ {
        self.columns
            .iter()
            .filter(|c| c.group != FeatureGroup::Population)
    }

    /// Write the table as CSV: identifier first, absent cells left empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut w = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(CUSTOMER_ID_COLUMN);
        header.extend(self.columns.iter().map(|c| c.name.as_str()));
        w.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(row.values.len() + 1);
            record.push(row.customer_id.clone());
            record.extend(
                row.values
                    .iter()
                    .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
            );
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }
}
