/// One table column, built from a header cell.
///
/// Columns are 1-indexed and never change after the registry is built. The
/// table owns the cells; a column only holds handles to them.
#[derive(Debug, Clone)]
pub struct Column<E> {
    /// Position among the header cells, starting at 1
    pub index: usize,
    /// Header inner HTML captured before any mutation
    pub title: String,
    /// The header cell that hosts the navigation controls while active
    pub header_cell: E,
    /// Every header and body cell at this column position
    pub cells: Vec<E>,
}

impl<E> Column<E> {
    pub fn new(index: usize, title: String, header_cell: E, cells: Vec<E>) -> Self {
        Self {
            index,
            title,
            header_cell,
            cells,
        }
    }
}
