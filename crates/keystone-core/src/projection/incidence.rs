//! Bipartite incidence matrices and their normalizations.

use crate::{Cell, KeystoneError, NodeId, Table};
use ndarray::{Array2, Axis};
use std::collections::BTreeMap;

/// Incidence between ordered row entities R and column entities C.
///
/// The row order is significant: projection output is indexed by it.
#[derive(Debug, Clone, PartialEq)]
pub struct BipartiteIncidence {
    rows: Vec<NodeId>,
    columns: Vec<NodeId>,
    matrix: Array2<f64>,
}

fn index_ids(ids: &[NodeId], side: &str) -> Result<BTreeMap<NodeId, usize>, KeystoneError> {
    let mut index = BTreeMap::new();
    for (i, id) in ids.iter().enumerate() {
        if index.insert(id.clone(), i).is_some() {
            return Err(KeystoneError::InvalidParameter(format!(
                "duplicate {} entity '{}'",
                side, id
            )));
        }
    }
    Ok(index)
}

impl BipartiteIncidence {
    /// Wrap an existing `|rows| × |columns|` matrix.
    pub fn new(
        rows: Vec<NodeId>,
        columns: Vec<NodeId>,
        matrix: Array2<f64>,
    ) -> Result<Self, KeystoneError> {
        if matrix.dim() != (rows.len(), columns.len()) {
            return Err(KeystoneError::InvalidParameter(format!(
                "incidence matrix is {:?}, expected ({}, {})",
                matrix.dim(),
                rows.len(),
                columns.len()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(KeystoneError::InvalidParameter(
                "incidence matrix contains non-finite values".to_string(),
            ));
        }
        index_ids(&rows, "row")?;
        index_ids(&columns, "column")?;
        Ok(Self {
            rows,
            columns,
            matrix,
        })
    }

    /// Build from `(row, column, weight)` triples.
    ///
    /// `rows` fixes the output order. Columns are numbered in first-seen
    /// order. Repeated pairs accumulate their weights. A pair naming a row
    /// outside `rows` is a `MalformedEdge` at the pair's position.
    pub fn from_pairs<I, R, C>(rows: Vec<NodeId>, pairs: I) -> Result<Self, KeystoneError>
    where
        I: IntoIterator<Item = (R, C, f64)>,
        R: Into<NodeId>,
        C: Into<NodeId>,
    {
        if rows.is_empty() {
            return Err(KeystoneError::InvalidParameter(
                "row order is empty".to_string(),
            ));
        }
        let row_index = index_ids(&rows, "row")?;

        let mut columns: Vec<NodeId> = Vec::new();
        let mut column_index: BTreeMap<NodeId, usize> = BTreeMap::new();
        let mut entries: Vec<(usize, usize, f64)> = Vec::new();

        for (position, (row, column, weight)) in pairs.into_iter().enumerate() {
            let row: NodeId = row.into();
            let r = *row_index
                .get(&row)
                .ok_or_else(|| KeystoneError::MalformedEdge {
                    row: position,
                    reason: format!("'{}' is not in the row order", row),
                })?;
            if !weight.is_finite() {
                return Err(KeystoneError::MalformedEdge {
                    row: position,
                    reason: format!("non-finite weight {}", weight),
                });
            }
            let column: NodeId = column.into();
            let c = match column_index.get(&column) {
                Some(&c) => c,
                None => {
                    let c = columns.len();
                    column_index.insert(column.clone(), c);
                    columns.push(column);
                    c
                }
            };
            entries.push((r, c, weight));
        }

        let mut matrix = Array2::<f64>::zeros((rows.len(), columns.len()));
        for (r, c, w) in entries {
            matrix[[r, c]] += w;
        }
        Ok(Self {
            rows,
            columns,
            matrix,
        })
    }

    /// Build from a two-column table (plus optional weight column).
    ///
    /// Rows with a missing weight count as weight 1.
    pub fn from_table(
        table: &Table,
        row_column: &str,
        column_column: &str,
        weight_column: Option<&str>,
        rows: Vec<NodeId>,
    ) -> Result<Self, KeystoneError> {
        for column in [row_column, column_column] {
            if !table.has_column(column) {
                return Err(KeystoneError::MissingColumn(column.to_string()));
            }
        }
        if let Some(column) = weight_column {
            if !table.has_column(column) {
                return Err(KeystoneError::MissingColumn(column.to_string()));
            }
        }

        let mut pairs = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let id = |column: &str| {
                table
                    .cell(row, column)
                    .as_id()
                    .ok_or_else(|| KeystoneError::MalformedEdge {
                        row,
                        reason: format!("empty '{}' cell", column),
                    })
            };
            let weight = weight_column
                .map(|c| table.cell(row, c))
                .and_then(Cell::as_f64)
                .unwrap_or(1.0);
            pairs.push((id(row_column)?, id(column_column)?, weight));
        }
        Self::from_pairs(rows, pairs)
    }

    /// Swap the roles of rows and columns (project onto C instead of R).
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self {
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            matrix: self.matrix.t().to_owned(),
        }
    }

    /// Row entities in output order.
    #[must_use]
    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    /// Column entities.
    #[must_use]
    pub fn columns(&self) -> &[NodeId] {
        &self.columns
    }

    /// The `|R| × |C|` matrix.
    #[must_use]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Indices of rows without any incidence.
    #[must_use]
    pub fn empty_rows(&self) -> Vec<usize> {
        self.matrix
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, r)| r.iter().all(|v| *v == 0.0))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of columns without any incidence.
    #[must_use]
    pub fn empty_columns(&self) -> Vec<usize> {
        self.matrix
            .columns()
            .into_iter()
            .enumerate()
            .filter(|(_, c)| c.iter().all(|v| *v == 0.0))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Divide each row by its L1 norm; all-zero rows are left unchanged.
#[must_use]
pub fn row_normalize(m: &Array2<f64>) -> Array2<f64> {
    let mut out = m.clone();
    for mut row in out.rows_mut() {
        let norm: f64 = row.iter().map(|v| v.abs()).sum();
        if norm != 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    out
}

/// Divide each column by its sum; zero-sum columns are left unchanged.
#[must_use]
pub fn column_normalize(m: &Array2<f64>) -> Array2<f64> {
    let sums = m.sum_axis(Axis(0));
    let mut out = m.clone();
    for (mut column, sum) in out.columns_mut().into_iter().zip(sums.iter()) {
        if *sum != 0.0 {
            column.mapv_inplace(|v| v / sum);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::new(*n)).collect()
    }

    #[test]
    fn pairs_follow_row_order() {
        let incidence = BipartiteIncidence::from_pairs(
            ids(&["r2", "r1"]),
            vec![("r1", "x", 1.0), ("r2", "y", 1.0), ("r1", "y", 2.0)],
        )
        .expect("build");

        assert_eq!(incidence.columns(), ids(&["x", "y"]).as_slice());
        assert_eq!(incidence.matrix(), &array![[0.0, 1.0], [1.0, 2.0]]);
    }

    #[test]
    fn unknown_row_is_malformed() {
        let result = BipartiteIncidence::from_pairs(ids(&["a"]), vec![("b", "x", 1.0)]);
        assert!(matches!(result, Err(KeystoneError::MalformedEdge { row: 0, .. })));
    }

    #[test]
    fn duplicate_rows_rejected() {
        let result = BipartiteIncidence::from_pairs(ids(&["a", "a"]), Vec::<(&str, &str, f64)>::new());
        assert!(matches!(result, Err(KeystoneError::InvalidParameter(_))));
    }

    #[test]
    fn table_builder_defaults_weight_to_one() {
        let mut row = Record::new();
        row.insert("item".into(), Cell::from("a"));
        row.insert("tag".into(), Cell::from("t"));
        let table = Table::from_rows(vec![row]);

        let incidence =
            BipartiteIncidence::from_table(&table, "item", "tag", None, ids(&["a", "b"]))
                .expect("build");
        assert_eq!(incidence.matrix(), &array![[1.0], [0.0]]);
        assert_eq!(incidence.empty_rows(), vec![1]);

        let missing = BipartiteIncidence::from_table(&table, "item", "kind", None, ids(&["a"]));
        assert!(matches!(missing, Err(KeystoneError::MissingColumn(c)) if c == "kind"));
    }

    #[test]
    fn normalizations_leave_zero_lines() {
        let m = array![[1.0, 3.0], [0.0, 0.0]];
        assert_eq!(row_normalize(&m), array![[0.25, 0.75], [0.0, 0.0]]);
        let m = array![[2.0, 0.0], [2.0, 0.0]];
        assert_eq!(column_normalize(&m), array![[0.5, 0.0], [0.5, 0.0]]);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let result = BipartiteIncidence::new(ids(&["a"]), ids(&["x", "y"]), array![[1.0]]);
        assert!(result.is_err());
    }
}
