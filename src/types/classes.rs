//! CSS class and attribute names applied to the managed table.
//!
//! These names are the only contract with the stylesheet layer.

/// Marker class added to every managed table.
pub const TABLE: &str = "tabletrim";
/// Table class while the active column sits after the sticky column.
pub const LTR: &str = "tabletrim-ltr";
/// Table class while the active column sits before the sticky column.
pub const RTL: &str = "tabletrim-rtl";
/// Table class while collapsed.
pub const TRIMMED: &str = "tabletrim-trimmed";
/// Cell class for the active column.
pub const ACTIVE: &str = "tabletrim-active";
/// Cell class for the sticky column.
pub const STICKY: &str = "tabletrim-sticky";

pub const CONTROLS: &str = "tabletrim-controls";
pub const SELECT: &str = "tabletrim-select";
pub const LABEL: &str = "tabletrim-label";
pub const TITLE: &str = "tabletrim-title";
pub const PREV: &str = "tabletrim-prev";
pub const NEXT: &str = "tabletrim-next";

/// Attribute holding the generated table id.
pub const ID_ATTRIBUTE: &str = "data-tabletrimid";

/// Element id of the column selector for the table with the given id.
pub fn select_id(table_id: &str) -> String {
    format!("tabletrim-select-{table_id}")
}
