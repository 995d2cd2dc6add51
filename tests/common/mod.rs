//! Shared fixtures for the integration tests.
//!
//! The basic table has four columns and three body rows; the third header
//! carries markup so title restoration can be checked byte for byte.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use tabletrim::dom::memory::{MemoryElement, MemoryHost};
use tabletrim::dom::Element;
use tabletrim::{classes, Hooks, Options, TableTrim};

pub const HEADERS: [&str; 4] = ["Name", "Alpha", "<em>Beta</em> &amp; co", "Gamma"];

/// Width below the default 640px breakpoint.
pub const NARROW: f64 = 320.0;
/// Width above the default breakpoint.
pub const WIDE: f64 = 960.0;

pub struct Fixture {
    pub host: MemoryHost,
    pub table: MemoryElement,
}

impl Fixture {
    pub fn new(width: f64) -> Self {
        let host = MemoryHost::new();
        let table = host.table(
            &HEADERS,
            &[
                vec!["Ann", "a1", "b1", "g1"],
                vec!["Bob", "a2", "b2", "g2"],
                vec!["Cid", "a3", "b3", "g3"],
            ],
        );
        table.set_width(width);
        Self { host, table }
    }

    pub fn wide() -> Self {
        Self::new(WIDE)
    }

    pub fn narrow() -> Self {
        Self::new(NARROW)
    }

    pub fn build(&self, options: Options) -> TableTrim<MemoryHost> {
        self.build_with(options, Hooks::new())
    }

    pub fn build_with(&self, options: Options, hooks: Hooks<MemoryElement>) -> TableTrim<MemoryHost> {
        TableTrim::new(self.host.clone(), self.table.clone(), options, hooks).unwrap()
    }

    /// Body cell at 1-based `row` and `col`.
    pub fn body_cell(&self, row: usize, col: usize) -> MemoryElement {
        let tbody = self.table.children()[1].clone();
        let tr = tbody.children()[row - 1].clone();
        tr.children()[col - 1].clone()
    }

    /// Header cell at 1-based `col`.
    pub fn header_cell(&self, col: usize) -> MemoryElement {
        let thead = self.table.children()[0].clone();
        let tr = thead.children()[0].clone();
        tr.children()[col - 1].clone()
    }

    /// Every cell (header and body) at 1-based `col`.
    pub fn column(&self, col: usize) -> Vec<MemoryElement> {
        let mut cells = vec![self.header_cell(col)];
        cells.extend((1..=3).map(|row| self.body_cell(row, col)));
        cells
    }

    pub fn is_active(&self, col: usize) -> bool {
        self.body_cell(1, col).has_class(classes::ACTIVE)
    }

    pub fn is_sticky(&self, col: usize) -> bool {
        self.body_cell(1, col).has_class(classes::STICKY)
    }

    /// Columns whose cells all carry the active class.
    pub fn active_columns(&self) -> Vec<usize> {
        (1..=HEADERS.len())
            .filter(|col| self.column(*col).iter().all(|c| c.has_class(classes::ACTIVE)))
            .collect()
    }

    /// Whether any cell in the table carries `class`.
    pub fn any_cell_has(&self, class: &str) -> bool {
        (1..=HEADERS.len()).any(|col| self.column(col).iter().any(|c| c.has_class(class)))
    }

    pub fn controls(&self) -> Option<MemoryElement> {
        self.table.find_by_class(classes::CONTROLS)
    }

    /// Column whose header currently hosts the controls.
    pub fn controls_column(&self) -> Option<usize> {
        let controls = self.controls()?;
        (1..=HEADERS.len()).find(|col| self.header_cell(*col).contains(&controls))
    }

    pub fn widget(&self, class: &str) -> MemoryElement {
        self.table
            .find_by_class(class)
            .unwrap_or_else(|| panic!("no element with class {class} in the table"))
    }
}

/// Ordered record of hook invocations, e.g. `"activate:3"`.
#[derive(Clone, Default)]
pub struct HookLog(Rc<RefCell<Vec<String>>>);

impl HookLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    /// Hooks that record every lifecycle event into this log.
    pub fn hooks(&self) -> Hooks<MemoryElement> {
        let (init, trim, untrim, activate, deactivate) =
            (self.clone(), self.clone(), self.clone(), self.clone(), self.clone());
        Hooks::<MemoryElement>::new()
            .on_init(move |_| init.push("init".to_string()))
            .on_trim(move |table| {
                trim.push(format!("trim:{}", table.has_class(classes::TRIMMED)));
            })
            .on_untrim(move |_| untrim.push("untrim".to_string()))
            .on_activate(move |_, column| activate.push(format!("activate:{}", column.index)))
            .on_deactivate(move |_, column| {
                deactivate.push(format!("deactivate:{}", column.index));
            })
    }
}
