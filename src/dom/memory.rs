//! In-memory DOM host.
//!
//! A minimal element tree with classes, attributes, inner HTML, listeners and a
//! virtual clock. It lets the controller run without a browser: tests drive it
//! with [`MemoryHost::resize`], [`MemoryElement::dispatch`] and
//! [`MemoryHost::advance`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Handler, Host};
use crate::error::{Result, TabletrimError};
use crate::types::classes;

/// Width given to tables created by [`MemoryHost::table`].
pub const DEFAULT_TABLE_WIDTH: f64 = 960.0;

type ListenerEntry = (u64, &'static str, Handler);

struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    html: String,
    value: String,
    width: f64,
    children: Vec<MemoryElement>,
    parent: Weak<RefCell<Node>>,
    listeners: Vec<ListenerEntry>,
}

/// Shared handle to an in-memory element.
#[derive(Clone)]
pub struct MemoryElement(Rc<RefCell<Node>>);

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.tag())
            .field("classes", &self.classes())
            .finish()
    }
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            html: String::new(),
            value: String::new(),
            width: 0.0,
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        })))
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    pub fn parent(&self) -> Option<MemoryElement> {
        self.0.borrow().parent.upgrade().map(MemoryElement)
    }

    pub fn ptr_eq(&self, other: &MemoryElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `other` is a descendant of this element.
    pub fn contains(&self, other: &MemoryElement) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// First element (self included) carrying `class`, depth first.
    pub fn find_by_class(&self, class: &str) -> Option<MemoryElement> {
        if self.0.borrow().classes.iter().any(|c| c == class) {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_by_class(class))
    }

    pub fn outer_html(&self) -> String {
        let node = self.0.borrow();
        let mut out = format!("<{}", node.tag);
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        out.push_str(&node.html);
        for child in &node.children {
            out.push_str(&child.outer_html());
        }
        out.push_str(&format!("</{}>", node.tag));
        out
    }

    pub fn set_width(&self, width: f64) {
        self.0.borrow_mut().width = width;
    }

    /// Run every handler registered for `event`. Returns how many ran.
    pub fn dispatch(&self, event: &str) -> usize {
        let handlers: Vec<Handler> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, name, _)| *name == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    fn detach(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn child_elements(&self, tags: &[&str]) -> Vec<MemoryElement> {
        self.children()
            .into_iter()
            .filter(|child| tags.contains(&child.tag().as_str()))
            .collect()
    }

    fn rows(&self) -> Vec<MemoryElement> {
        let mut rows = Vec::new();
        for child in self.children() {
            match child.tag().as_str() {
                "thead" | "tbody" | "tfoot" => rows.extend(child.child_elements(&["tr"])),
                "tr" => rows.push(child),
                _ => {}
            }
        }
        rows
    }
}

impl super::Element for MemoryElement {
    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn inner_html(&self) -> String {
        let node = self.0.borrow();
        let mut out = node.html.clone();
        for child in &node.children {
            out.push_str(&child.outer_html());
        }
        out
    }

    fn set_inner_html(&self, html: &str) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
        self.0.borrow_mut().html = html.to_string();
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    fn append_child(&self, child: &Self) {
        if child.ptr_eq(self) || child.contains(self) {
            log::warn!("[tabletrim] refusing to append an element into its own subtree");
            return;
        }
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    fn width(&self) -> f64 {
        self.0.borrow().width
    }
}

enum ListenerTarget {
    Element(Weak<RefCell<Node>>),
    Window(Weak<RefCell<HostState>>),
}

/// Registration guard; dropping it removes the listener.
pub struct MemoryListener {
    id: u64,
    target: ListenerTarget,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        let id = self.id;
        match &self.target {
            ListenerTarget::Element(node) => {
                if let Some(node) = node.upgrade() {
                    if let Ok(mut node) = node.try_borrow_mut() {
                        node.listeners.retain(|(entry, _, _)| *entry != id);
                    }
                }
            }
            ListenerTarget::Window(state) => {
                if let Some(state) = state.upgrade() {
                    if let Ok(mut state) = state.try_borrow_mut() {
                        state.window_listeners.retain(|(entry, _, _)| *entry != id);
                    }
                }
            }
        }
    }
}

struct PendingTimer {
    id: u64,
    due_ms: u64,
    callback: Handler,
}

#[derive(Default)]
struct HostState {
    now_ms: u64,
    next_id: u64,
    window_listeners: Vec<ListenerEntry>,
    timers: Vec<PendingTimer>,
    tables: Vec<MemoryElement>,
}

impl HostState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory document and window with a virtual clock.
#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a `table > thead/tbody > tr > th/td` tree and register it with the document.
    pub fn table(&self, headers: &[&str], rows: &[Vec<&str>]) -> MemoryElement {
        use super::Element as _;

        let table = MemoryElement::new("table");
        table.set_width(DEFAULT_TABLE_WIDTH);

        let thead = MemoryElement::new("thead");
        let header_row = MemoryElement::new("tr");
        for header in headers {
            let cell = MemoryElement::new("th");
            cell.set_inner_html(header);
            header_row.append_child(&cell);
        }
        thead.append_child(&header_row);
        table.append_child(&thead);

        let tbody = MemoryElement::new("tbody");
        for row in rows {
            let tr = MemoryElement::new("tr");
            for value in row {
                let cell = MemoryElement::new("td");
                cell.set_inner_html(value);
                tr.append_child(&cell);
            }
            tbody.append_child(&tr);
        }
        table.append_child(&tbody);

        self.register(&table);
        table
    }

    /// Make `element` visible to document-wide lookups such as id checks.
    pub fn register(&self, element: &MemoryElement) {
        self.state.borrow_mut().tables.push(element.clone());
    }

    /// Set the table width and fire the window `resize` event.
    pub fn resize(&self, table: &MemoryElement, width: f64) -> usize {
        table.set_width(width);
        self.dispatch_window("resize")
    }

    /// Run every window handler registered for `event`. Returns how many ran.
    pub fn dispatch_window(&self, event: &str) -> usize {
        let handlers: Vec<Handler> = self
            .state
            .borrow()
            .window_listeners
            .iter()
            .filter(|(_, name, _)| *name == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn window_listener_count(&self) -> usize {
        self.state.borrow().window_listeners.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Move the virtual clock forward, firing due timers in deadline order.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now_ms + ms;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let position = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due_ms <= target)
                    .min_by_key(|(_, timer)| (timer.due_ms, timer.id))
                    .map(|(i, _)| i);
                position.map(|i| {
                    let timer = state.timers.remove(i);
                    state.now_ms = state.now_ms.max(timer.due_ms);
                    timer.callback
                })
            };
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }
}

impl Host for MemoryHost {
    type Element = MemoryElement;
    type Listener = MemoryListener;
    type Callback = Handler;
    type TimerId = u64;

    fn header_cells(&self, table: &MemoryElement) -> Result<Vec<MemoryElement>> {
        if table.tag() != "table" {
            return Err(TabletrimError::config(format!(
                "expected a table element, got <{}>",
                table.tag()
            )));
        }
        let header_row = table
            .child_elements(&["thead"])
            .into_iter()
            .find_map(|thead| thead.child_elements(&["tr"]).into_iter().next())
            .ok_or_else(|| TabletrimError::config("table has no header row"))?;
        let cells = header_row.child_elements(&["th", "td"]);
        if cells.is_empty() {
            return Err(TabletrimError::config("table header row has no cells"));
        }
        Ok(cells)
    }

    fn column_cells(&self, table: &MemoryElement, index: usize) -> Vec<MemoryElement> {
        let Some(position) = index.checked_sub(1) else {
            return Vec::new();
        };
        table
            .rows()
            .iter()
            .filter_map(|row| row.child_elements(&["th", "td"]).into_iter().nth(position))
            .collect()
    }

    fn create_element(&self, tag: &str) -> Result<MemoryElement> {
        Ok(MemoryElement::new(tag))
    }

    fn listen(
        &self,
        target: &MemoryElement,
        event: &'static str,
        handler: Handler,
    ) -> Result<MemoryListener> {
        let id = self.state.borrow_mut().next_id();
        target.0.borrow_mut().listeners.push((id, event, handler));
        Ok(MemoryListener {
            id,
            target: ListenerTarget::Element(Rc::downgrade(&target.0)),
        })
    }

    fn listen_viewport(&self, handler: Handler) -> Result<Vec<MemoryListener>> {
        let mut state = self.state.borrow_mut();
        let mut listeners = Vec::new();
        for event in ["resize", "scroll"] {
            let id = state.next_id();
            state
                .window_listeners
                .push((id, event, Rc::clone(&handler)));
            listeners.push(MemoryListener {
                id,
                target: ListenerTarget::Window(Rc::downgrade(&self.state)),
            });
        }
        Ok(listeners)
    }

    fn create_callback(&self, handler: Handler) -> Handler {
        handler
    }

    fn set_timeout(&self, callback: &Handler, delay_ms: u32) -> Option<u64> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let due_ms = state.now_ms + u64::from(delay_ms);
        state.timers.push(PendingTimer {
            id,
            due_ms,
            callback: Rc::clone(callback),
        });
        Some(id)
    }

    fn clear_timeout(&self, timer: u64) {
        self.state.borrow_mut().timers.retain(|t| t.id != timer);
    }

    fn is_id_taken(&self, id: &str) -> bool {
        self.state
            .borrow()
            .tables
            .iter()
            .any(|table| table.attribute(classes::ID_ATTRIBUTE).as_deref() == Some(id))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use std::cell::Cell;

    #[test]
    fn test_append_child_moves_between_parents() {
        let first = MemoryElement::new("th");
        let second = MemoryElement::new("th");
        let controls = MemoryElement::new("div");

        first.append_child(&controls);
        assert!(first.contains(&controls));

        second.append_child(&controls);
        assert!(!first.contains(&controls));
        assert!(second.contains(&controls));
        assert!(first.children().is_empty());
    }

    #[test]
    fn test_set_inner_html_detaches_children() {
        let cell = MemoryElement::new("th");
        let controls = MemoryElement::new("div");
        cell.append_child(&controls);

        cell.set_inner_html("<b>Title</b>");
        assert_eq!(cell.inner_html(), "<b>Title</b>");
        assert!(controls.parent().is_none());
    }

    #[test]
    fn test_inner_html_serializes_children() {
        let cell = MemoryElement::new("th");
        let span = MemoryElement::new("span");
        span.add_class("tabletrim-title");
        span.set_inner_html("Beta");
        cell.append_child(&span);
        assert_eq!(
            cell.inner_html(),
            "<span class=\"tabletrim-title\">Beta</span>"
        );
    }

    #[test]
    fn test_dropping_listener_unregisters_it() {
        let host = MemoryHost::new();
        let button = MemoryElement::new("button");
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let listener = host
            .listen(&button, "click", Rc::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        assert_eq!(button.dispatch("click"), 1);
        drop(listener);
        assert_eq!(button.dispatch("click"), 0);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let host = MemoryHost::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let late = {
            let order = Rc::clone(&order);
            host.create_callback(Rc::new(move || order.borrow_mut().push("late")))
        };
        let early = {
            let order = Rc::clone(&order);
            host.create_callback(Rc::new(move || order.borrow_mut().push("early")))
        };
        host.set_timeout(&late, 50);
        host.set_timeout(&early, 10);

        host.advance(5);
        assert!(order.borrow().is_empty());
        host.advance(100);
        assert_eq!(*order.borrow(), vec!["early", "late"]);
        assert_eq!(host.now_ms(), 105);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let host = MemoryHost::new();
        let fired = Rc::new(Cell::new(false));
        let callback = {
            let fired = Rc::clone(&fired);
            host.create_callback(Rc::new(move || fired.set(true)))
        };
        let id = host.set_timeout(&callback, 10).unwrap();
        host.clear_timeout(id);
        host.advance(20);
        assert!(!fired.get());
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn test_header_and_column_cells() {
        let host = MemoryHost::new();
        let table = host.table(&["A", "B", "C"], &[vec!["1", "2", "3"], vec!["4", "5", "6"]]);

        let headers = host.header_cells(&table).unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[1].inner_html(), "B");

        let column = host.column_cells(&table, 2);
        let values: Vec<String> = column.iter().map(Element::inner_html).collect();
        assert_eq!(values, vec!["B", "2", "5"]);
        assert!(host.column_cells(&table, 0).is_empty());
    }

    #[test]
    fn test_header_cells_rejects_non_tables() {
        let host = MemoryHost::new();
        let div = MemoryElement::new("div");
        assert!(matches!(
            host.header_cells(&div),
            Err(TabletrimError::Configuration(_))
        ));

        let bare = MemoryElement::new("table");
        assert!(host.header_cells(&bare).is_err());
    }
}
