//! Element-handle capabilities the controller needs from a DOM.
//!
//! The controller never talks to a concrete DOM library. Any environment that
//! can add/remove classes, swap inner HTML, move a node, look up cells by
//! column position and deliver events can drive a trimmed table:
//! - [`memory`] keeps a small tree in memory (headless use, native tests)
//! - `crate::web` wraps `web-sys` in the browser

pub mod memory;

use std::rc::Rc;

use crate::error::Result;

/// A handle to one DOM element. Clones refer to the same element.
pub trait Element: Clone + 'static {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn inner_html(&self) -> String;
    /// Replace the content. Child elements are detached, not destroyed.
    fn set_inner_html(&self, html: &str);
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    /// Append `child`, moving it out of its current parent first.
    fn append_child(&self, child: &Self);
    /// Form value (selected option value for a `select`).
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    /// Rendered width in CSS pixels.
    fn width(&self) -> f64;
}

/// Event handler shared between the host and the controller.
pub type Handler = Rc<dyn Fn()>;

/// The document/window side of the environment.
///
/// `Listener` values keep a registration alive; dropping one removes the
/// listener. `Callback` is a timer callback created once and armed many times.
pub trait Host: 'static {
    type Element: Element;
    type Listener: 'static;
    type Callback: 'static;
    type TimerId: Copy + 'static;

    /// Header row cells of `table` in document order.
    ///
    /// # Errors
    /// Configuration error when `table` is not a table or has no header row.
    fn header_cells(&self, table: &Self::Element) -> Result<Vec<Self::Element>>;

    /// Header and body cells at 1-based column `index`, in row order.
    fn column_cells(&self, table: &Self::Element, index: usize) -> Vec<Self::Element>;

    /// # Errors
    /// Environment error when the element cannot be created.
    fn create_element(&self, tag: &str) -> Result<Self::Element>;

    /// Listen for `event` on `target`.
    ///
    /// # Errors
    /// Environment error when the listener cannot be registered.
    fn listen(
        &self,
        target: &Self::Element,
        event: &'static str,
        handler: Handler,
    ) -> Result<Self::Listener>;

    /// Listen for viewport changes (resize and scroll of the window).
    ///
    /// # Errors
    /// Environment error when the listeners cannot be registered.
    fn listen_viewport(&self, handler: Handler) -> Result<Vec<Self::Listener>>;

    fn create_callback(&self, handler: Handler) -> Self::Callback;

    /// Arm a one-shot timer. `None` when the timer could not be armed.
    fn set_timeout(&self, callback: &Self::Callback, delay_ms: u32) -> Option<Self::TimerId>;

    fn clear_timeout(&self, timer: Self::TimerId);

    /// Whether another table in the document already carries `id`.
    fn is_id_taken(&self, id: &str) -> bool;

    /// Fill `buf` with random bytes for id generation.
    ///
    /// # Errors
    /// Environment error when no entropy source is available.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf)
            .map_err(|e| crate::error::TabletrimError::environment(format!("entropy: {e}")))
    }
}
