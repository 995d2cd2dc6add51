//! Column visibility state machine.
//!
//! A [`Controller`] owns everything about one managed table: the column
//! registry, the options and hooks, the navigation controls, the trimmed flag
//! and the active column. All DOM mutation goes through the transitions here:
//! - `check` compares the table width with the breakpoint
//! - `trim`/`untrim` enter and leave collapsed mode
//! - `activate` switches the visible non-sticky column
//!
//! Each transition validates first and then applies its mutations and hooks in
//! a fixed order, so a failed call leaves the table untouched.

mod controls;
mod indexes;

pub use controls::Controls;
pub use indexes::NavIndexes;

use serde::Serialize;

use crate::dom::{Element, Host};
use crate::error::{Result, TabletrimError};
use crate::monitor::ViewportMonitor;
use crate::registry::ColumnRegistry;
use crate::types::{classes, Column, Hooks, Options};

/// Collapse state of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimState {
    #[default]
    Untrimmed,
    Trimmed,
}

/// Read-only view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrimSnapshot {
    pub state: TrimState,
    /// Active non-sticky column, `None` while untrimmed
    pub active: Option<usize>,
    pub next: usize,
    pub prev: usize,
    /// Sticky column, 0 for none
    pub sticky: usize,
    pub columns: usize,
}

impl TrimSnapshot {
    pub fn is_trimmed(&self) -> bool {
        self.state == TrimState::Trimmed
    }
}

/// Length of the generated table id.
const ID_LEN: usize = 6;
/// Attempts at finding an id no other table uses.
const ID_ATTEMPTS: usize = 16;

pub struct Controller<H: Host> {
    pub(crate) host: H,
    table: H::Element,
    id: String,
    options: Options,
    hooks: Hooks<H::Element>,
    registry: ColumnRegistry<H::Element>,
    controls: Option<Controls<H::Element>>,
    state: TrimState,
    active: Option<usize>,
    nav: NavIndexes,
    pub(crate) listeners: Vec<H::Listener>,
    pub(crate) monitor: ViewportMonitor<H>,
}

impl<H: Host> Controller<H> {
    /// Build the registry, validate `options` against it, mark the table and
    /// build the navigation controls. Listeners are bound by the handle.
    ///
    /// # Errors
    /// Configuration error for a malformed table or invalid options (the table
    /// is left untouched); environment error when the host cannot create the
    /// controls or an id.
    pub fn new(
        host: H,
        table: H::Element,
        options: Options,
        hooks: Hooks<H::Element>,
    ) -> Result<Self> {
        let registry = ColumnRegistry::build(&host, &table)?;
        options.validate(registry.len())?;

        let id = generate_id(&host)?;
        let controls = Controls::build(&host, &registry, &options, &id)?;
        table.add_class(classes::TABLE);
        table.set_attribute(classes::ID_ATTRIBUTE, &id);
        log::debug!(
            "[tabletrim] managing table {id} with {} columns (sticky {}, init {})",
            registry.len(),
            options.sticky_index,
            options.init_index
        );

        let nav = NavIndexes::compute(options.init_index, options.sticky_index, registry.len());
        let monitor = ViewportMonitor::new(options.lag);
        Ok(Self {
            host,
            table,
            id,
            options,
            hooks,
            registry,
            controls,
            state: TrimState::Untrimmed,
            active: None,
            nav,
            listeners: Vec::new(),
            monitor,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table(&self) -> &H::Element {
        &self.table
    }

    pub fn registry(&self) -> &ColumnRegistry<H::Element> {
        &self.registry
    }

    pub fn controls(&self) -> Option<&Controls<H::Element>> {
        self.controls.as_ref()
    }

    pub fn is_trimmed(&self) -> bool {
        self.state == TrimState::Trimmed
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn next_index(&self) -> usize {
        self.nav.next
    }

    pub fn prev_index(&self) -> usize {
        self.nav.prev
    }

    pub fn snapshot(&self) -> TrimSnapshot {
        TrimSnapshot {
            state: self.state,
            active: self.active,
            next: self.nav.next,
            prev: self.nav.prev,
            sticky: self.options.sticky_index,
            columns: self.registry.len(),
        }
    }

    pub(crate) fn fire_init(&mut self) {
        if let Some(hook) = self.hooks.on_init.as_mut() {
            hook(&self.table);
        }
    }

    /// Trim or untrim depending on the current table width.
    ///
    /// Repeated calls in the same width regime do nothing.
    pub fn check(&mut self) -> Result<()> {
        let width = self.table.width();
        if width > self.options.breakpoint && self.is_trimmed() {
            self.untrim();
        } else if width <= self.options.breakpoint && !self.is_trimmed() {
            self.trim(None)?;
        }
        Ok(())
    }

    /// Rearm the debounced width check.
    pub(crate) fn schedule_check(&mut self) {
        self.monitor.signal(&self.host);
    }

    /// Enter collapsed mode showing column `index` (default `init_index`).
    ///
    /// Returns `Ok(false)` without touching anything when already trimmed.
    /// Asking for the sticky column shows `init_index` next to it.
    ///
    /// # Errors
    /// [`TabletrimError::InvalidColumn`] when `index` is outside the table.
    pub fn trim(&mut self, index: Option<usize>) -> Result<bool> {
        if self.is_trimmed() {
            return Ok(false);
        }
        let requested = index.unwrap_or(self.options.init_index);
        self.ensure_column(requested)?;
        let target = if self.is_sticky(requested) {
            self.options.init_index
        } else {
            requested
        };

        self.table.add_class(classes::TRIMMED);
        if let Some(hook) = self.hooks.on_trim.as_mut() {
            hook(&self.table);
        }
        self.state = TrimState::Trimmed;
        log::debug!("[tabletrim] {} trimmed to column {target}", self.id);

        if self.options.has_sticky() {
            self.mark_sticky();
        }
        self.activate_column(target);
        Ok(true)
    }

    /// Leave collapsed mode. Returns `false` when the table was not trimmed.
    pub fn untrim(&mut self) -> bool {
        if !self.is_trimmed() {
            return false;
        }
        self.table.remove_class(classes::TRIMMED);
        self.table.remove_class(classes::RTL);
        self.table.remove_class(classes::LTR);
        if let Some(hook) = self.hooks.on_untrim.as_mut() {
            hook(&self.table);
        }
        self.deactivate();
        self.state = TrimState::Untrimmed;
        log::debug!("[tabletrim] {} untrimmed", self.id);
        true
    }

    /// Show column `index` next to the sticky column.
    ///
    /// While untrimmed this trims the table to `index`. Activating the sticky
    /// column only (re)applies its class: no deactivation, no control move and
    /// no `on_activate`.
    ///
    /// # Errors
    /// [`TabletrimError::InvalidColumn`] when `index` is outside the table;
    /// nothing is mutated in that case.
    pub fn activate(&mut self, index: usize) -> Result<()> {
        self.ensure_column(index)?;
        if !self.is_trimmed() {
            self.trim(Some(index))?;
            return Ok(());
        }
        if self.is_sticky(index) {
            self.mark_sticky();
            return Ok(());
        }
        self.activate_column(index);
        Ok(())
    }

    /// Restore markup and drop every listener and pending timer.
    pub fn dispose(&mut self) {
        self.untrim();
        self.monitor.cancel(&self.host);
        self.listeners.clear();
        if let Some(column) = self.registry.get(self.options.sticky_index) {
            for cell in &column.cells {
                cell.remove_class(classes::STICKY);
            }
        }
        self.table.remove_class(classes::TABLE);
        self.table.remove_attribute(classes::ID_ATTRIBUTE);
        log::debug!("[tabletrim] {} disposed", self.id);
    }

    fn ensure_column(&self, index: usize) -> Result<()> {
        if self.registry.contains(index) {
            Ok(())
        } else {
            Err(TabletrimError::InvalidColumn {
                index,
                count: self.registry.len(),
            })
        }
    }

    fn is_sticky(&self, index: usize) -> bool {
        self.options.has_sticky() && index == self.options.sticky_index
    }

    fn mark_sticky(&self) {
        if let Some(column) = self.registry.get(self.options.sticky_index) {
            for cell in &column.cells {
                cell.add_class(classes::STICKY);
            }
        }
    }

    /// Switch to non-sticky column `index`. Caller has validated it and trimmed.
    fn activate_column(&mut self, index: usize) {
        if self.active.is_some_and(|active| active != index) {
            self.deactivate();
        }

        if index > self.options.sticky_index {
            self.table.remove_class(classes::RTL);
            self.table.add_class(classes::LTR);
        } else {
            self.table.remove_class(classes::LTR);
            self.table.add_class(classes::RTL);
        }
        self.active = Some(index);

        let Some(column) = self.registry.get(index) else {
            return;
        };
        if let Some(controls) = &self.controls {
            controls.present(column);
        }
        for cell in &column.cells {
            cell.add_class(classes::ACTIVE);
        }
        self.nav = NavIndexes::compute(index, self.options.sticky_index, self.registry.len());
        log::debug!(
            "[tabletrim] {} activated column {index} (next {}, prev {})",
            self.id,
            self.nav.next,
            self.nav.prev
        );
        if let Some(hook) = self.hooks.on_activate.as_mut() {
            hook(&self.table, column);
        }
    }

    /// Hide the active column and give its header back its title.
    fn deactivate(&mut self) {
        let Some(index) = self.active.take() else {
            return;
        };
        let Some(column) = self.registry.get(index) else {
            return;
        };
        for cell in &column.cells {
            cell.remove_class(classes::ACTIVE);
        }
        restore_title(column);
        if let Some(hook) = self.hooks.on_deactivate.as_mut() {
            hook(&self.table, column);
        }
    }
}

impl<H: Host> Drop for Controller<H> {
    fn drop(&mut self) {
        self.monitor.cancel(&self.host);
    }
}

fn restore_title<E: Element>(column: &Column<E>) {
    column.header_cell.set_inner_html(&column.title);
}

/// Random base-36 id not used by any other table in the document.
fn generate_id<H: Host>(host: &H) -> Result<String> {
    for _ in 0..ID_ATTEMPTS {
        let mut bytes = [0u8; 4];
        host.fill_random(&mut bytes)?;
        let id = to_base36(u32::from_le_bytes(bytes), ID_LEN);
        if !host.is_id_taken(&id) {
            return Ok(id);
        }
    }
    Err(TabletrimError::environment(
        "could not generate a unique table id",
    ))
}

fn to_base36(mut value: u32, len: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let digit = usize::try_from(value % 36)
            .ok()
            .and_then(|i| DIGITS.get(i).copied())
            .unwrap_or(b'0');
        out.push(char::from(digit));
        value /= 36;
    }
    out.into_iter().rev().collect()
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

    fn controller(options: Options) -> Controller<MemoryHost> {
        let host = MemoryHost::new();
        let table = host.table(
            &["Name", "Alpha", "Beta", "Gamma"],
            &[vec!["n", "a", "b", "g"]],
        );
        Controller::new(host, table, options, Hooks::new()).unwrap()
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0, 6), "000000");
        assert_eq!(to_base36(35, 6), "00000z");
        assert_eq!(to_base36(36, 6), "000010");
        assert_eq!(to_base36(u32::MAX, 6).len(), 6);
    }

    #[test]
    fn test_new_marks_table_with_unique_id() {
        let c = controller(Options::default());
        assert!(c.table().has_class(classes::TABLE));
        assert_eq!(
            c.table().attribute(classes::ID_ATTRIBUTE).as_deref(),
            Some(c.id())
        );
        assert_eq!(c.id().len(), ID_LEN);
        assert!(c.host.is_id_taken(c.id()));
    }

    #[test]
    fn test_invalid_options_leave_table_untouched() {
        let host = MemoryHost::new();
        let table = host.table(&["A", "B"], &[vec!["1", "2"]]);
        let before = table.outer_html();
        let options = Options {
            init_index: 3,
            ..Options::default()
        };
        let result = Controller::new(host, table.clone(), options, Hooks::new());
        assert!(matches!(result, Err(TabletrimError::Configuration(_))));
        assert_eq!(table.outer_html(), before);
    }

    #[test]
    fn test_trim_is_a_no_op_when_trimmed() {
        let mut c = controller(Options::default());
        assert!(c.trim(None).unwrap());
        assert!(!c.trim(Some(3)).unwrap());
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn test_trim_to_sticky_shows_init_column() {
        let mut c = controller(Options::default());
        assert!(c.trim(Some(1)).unwrap());
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn test_invalid_column_changes_nothing() {
        let mut c = controller(Options::default());
        c.trim(None).unwrap();
        let before = c.snapshot();
        let markup = c.table().outer_html();

        assert_eq!(
            c.activate(5),
            Err(TabletrimError::InvalidColumn { index: 5, count: 4 })
        );
        assert!(c.activate(0).is_err());
        assert_eq!(c.snapshot(), before);
        assert_eq!(c.table().outer_html(), markup);
    }

    #[test]
    fn test_untrimmed_trim_with_invalid_column_fails_cleanly() {
        let mut c = controller(Options::default());
        assert!(c.trim(Some(9)).is_err());
        assert!(!c.is_trimmed());
        assert!(!c.table().has_class(classes::TRIMMED));
    }

    #[test]
    fn test_reactivating_active_column_keeps_it_active() {
        let mut c = controller(Options::default());
        c.trim(None).unwrap();
        c.activate(2).unwrap();
        let alpha = c.registry().get(2).unwrap();
        assert!(alpha.cells.iter().all(|cell| cell.has_class(classes::ACTIVE)));
        assert!(alpha.header_cell.contains(&c.controls().unwrap().container));
    }

    #[test]
    fn test_dispose_restores_markup() {
        let mut c = controller(Options::default());
        c.trim(None).unwrap();
        c.dispose();
        let table = c.table();
        assert!(!table.has_class(classes::TABLE));
        assert!(table.attribute(classes::ID_ATTRIBUTE).is_none());
        assert!(table.find_by_class(classes::STICKY).is_none());
        assert!(table.find_by_class(classes::ACTIVE).is_none());
        assert_eq!(c.registry().get(2).unwrap().header_cell.inner_html(), "Alpha");
    }
}
