//! Column registry built once from the table header row.

use crate::dom::{Element, Host};
use crate::error::{Result, TabletrimError};
use crate::types::Column;

/// Ordered, dense mapping from column index (1..=N) to [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnRegistry<E> {
    columns: Vec<Column<E>>,
}

impl<E: Element> ColumnRegistry<E> {
    /// Read the header row of `table` and collect every column.
    ///
    /// Titles are captured before anything touches the table. Nothing is mutated.
    ///
    /// # Errors
    /// Configuration error when `table` is not a table, has no header row, or
    /// has fewer than two columns.
    pub fn build<H>(host: &H, table: &E) -> Result<Self>
    where
        H: Host<Element = E>,
    {
        let headers = host.header_cells(table)?;
        if headers.len() < 2 {
            return Err(TabletrimError::config(format!(
                "table needs at least two columns, found {}",
                headers.len()
            )));
        }
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(position, header_cell)| {
                let index = position + 1;
                Column::new(
                    index,
                    header_cell.inner_html(),
                    header_cell,
                    host.column_cells(table, index),
                )
            })
            .collect();
        Ok(Self { columns })
    }
}

impl<E> ColumnRegistry<E> {
    /// Column at 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&Column<E>> {
        index.checked_sub(1).and_then(|i| self.columns.get(i))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        (1..=self.columns.len()).contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<E>> {
        self.columns.iter()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryHost;

    #[test]
    fn test_build_indexes_columns_from_one() {
        let host = MemoryHost::new();
        let table = host.table(
            &["Name", "<em>Age</em>", "City"],
            &[vec!["Ann", "31", "Oslo"]],
        );
        let registry = ColumnRegistry::build(&host, &table).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.get(0).is_none());
        assert!(registry.get(4).is_none());

        let age = registry.get(2).unwrap();
        assert_eq!(age.index, 2);
        assert_eq!(age.title, "<em>Age</em>");
        assert_eq!(age.cells.len(), 2);
        assert!(age.cells[0].ptr_eq(&age.header_cell));
        assert_eq!(age.cells[1].inner_html(), "31");
    }

    #[test]
    fn test_build_does_not_mutate_table() {
        let host = MemoryHost::new();
        let table = host.table(&["A", "B"], &[vec!["1", "2"]]);
        let before = table.outer_html();
        ColumnRegistry::build(&host, &table).unwrap();
        assert_eq!(table.outer_html(), before);
    }

    #[test]
    fn test_build_rejects_single_column() {
        let host = MemoryHost::new();
        let table = host.table(&["Only"], &[vec!["1"]]);
        assert!(matches!(
            ColumnRegistry::build(&host, &table),
            Err(TabletrimError::Configuration(_))
        ));
    }
}
