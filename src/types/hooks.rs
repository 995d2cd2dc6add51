use std::fmt;

use super::Column;

/// Hook receiving the table element.
pub type TableHook<E> = Box<dyn FnMut(&E)>;
/// Hook receiving the table element and the affected column.
pub type ColumnHook<E> = Box<dyn FnMut(&E, &Column<E>)>;

/// Lifecycle hooks.
///
/// `on_trim`/`on_untrim` run before the state flips; `on_activate`/`on_deactivate`
/// run after the DOM has been updated. Hooks must not call back into the same
/// table handle: such calls fail with [`crate::TabletrimError::Reentrant`].
pub struct Hooks<E> {
    pub on_init: Option<TableHook<E>>,
    pub on_trim: Option<TableHook<E>>,
    pub on_untrim: Option<TableHook<E>>,
    pub on_activate: Option<ColumnHook<E>>,
    pub on_deactivate: Option<ColumnHook<E>>,
}

impl<E> Default for Hooks<E> {
    fn default() -> Self {
        Self {
            on_init: None,
            on_trim: None,
            on_untrim: None,
            on_activate: None,
            on_deactivate: None,
        }
    }
}

impl<E> fmt::Debug for Hooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_init", &self.on_init.is_some())
            .field("on_trim", &self.on_trim.is_some())
            .field("on_untrim", &self.on_untrim.is_some())
            .field("on_activate", &self.on_activate.is_some())
            .field("on_deactivate", &self.on_deactivate.is_some())
            .finish()
    }
}

impl<E> Hooks<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.on_init = Some(Box::new(hook));
        self
    }

    pub fn on_trim(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.on_trim = Some(Box::new(hook));
        self
    }

    pub fn on_untrim(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.on_untrim = Some(Box::new(hook));
        self
    }

    pub fn on_activate(mut self, hook: impl FnMut(&E, &Column<E>) + 'static) -> Self {
        self.on_activate = Some(Box::new(hook));
        self
    }

    pub fn on_deactivate(mut self, hook: impl FnMut(&E, &Column<E>) + 'static) -> Self {
        self.on_deactivate = Some(Box::new(hook));
        self
    }
}
