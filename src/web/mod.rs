//! Browser host backed by `web-sys`, and the JavaScript-facing `TableTrim`.
//!
//! ```javascript
//! import init, { tabletrim } from 'tabletrim';
//! await init();
//! const tt = tabletrim(document.getElementById('prices'), {
//!     controls: ['prev', 'select', 'next'],
//!     stickyIndex: 1,
//!     initIndex: 2,
//!     onActivate: (table, column) => console.log(column.index, column.title),
//! });
//! tt.activate(3);
//! ```

mod bindings;

pub use bindings::{tabletrim, JsTableTrim};

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, EventTarget, HtmlElement, HtmlSelectElement, HtmlTableElement,
    HtmlTableRowElement, Window,
};

use crate::dom::{Element, Handler, Host};
use crate::error::{Result, TabletrimError};
use crate::types::classes;

/// A `web_sys::Element` behind the [`Element`] capabilities.
#[derive(Debug, Clone)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    pub fn as_element(&self) -> &web_sys::Element {
        &self.0
    }
}

impl From<web_sys::Element> for WebElement {
    fn from(element: web_sys::Element) -> Self {
        Self(element)
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            log::warn!("[tabletrim] add class {class}: {e:?}");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            log::warn!("[tabletrim] remove class {class}: {e:?}");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(e) = self.0.set_attribute(name, value) {
            log::warn!("[tabletrim] set attribute {name}: {e:?}");
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(e) = self.0.remove_attribute(name) {
            log::warn!("[tabletrim] remove attribute {name}: {e:?}");
        }
    }

    fn append_child(&self, child: &Self) {
        if let Err(e) = self.0.append_child(&child.0) {
            log::warn!("[tabletrim] append child: {e:?}");
        }
    }

    fn value(&self) -> String {
        match self.0.dyn_ref::<HtmlSelectElement>() {
            Some(select) => select.value(),
            None => self.0.get_attribute("value").unwrap_or_default(),
        }
    }

    fn set_value(&self, value: &str) {
        match self.0.dyn_ref::<HtmlSelectElement>() {
            Some(select) => select.set_value(value),
            None => self.set_attribute("value", value),
        }
    }

    fn width(&self) -> f64 {
        self.0
            .dyn_ref::<HtmlElement>()
            .map_or(0.0, |element| f64::from(element.offset_width()))
    }
}

/// Event listener registration; removed from its target on drop.
pub struct WebListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for WebListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("[tabletrim] remove {} listener: {e:?}", self.event);
        }
    }
}

/// The browser window and document.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// # Errors
    /// Environment error outside a browser window.
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| TabletrimError::environment("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| TabletrimError::environment("no document"))?;
        Ok(Self { window, document })
    }

    fn add_listener(
        target: EventTarget,
        event: &'static str,
        handler: Handler,
    ) -> Result<WebListener> {
        let prevent_default = event == "click";
        let closure = Closure::wrap(Box::new(move |e: Event| {
            if prevent_default {
                e.prevent_default();
            }
            handler();
        }) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| TabletrimError::environment(format!("add {event} listener: {e:?}")))?;
        Ok(WebListener {
            target,
            event,
            closure,
        })
    }
}

fn as_table(table: &WebElement) -> Result<&HtmlTableElement> {
    table
        .0
        .dyn_ref::<HtmlTableElement>()
        .ok_or_else(|| TabletrimError::config("expected an HTMLTableElement"))
}

impl Host for WebHost {
    type Element = WebElement;
    type Listener = WebListener;
    type Callback = Closure<dyn FnMut()>;
    type TimerId = i32;

    fn header_cells(&self, table: &WebElement) -> Result<Vec<WebElement>> {
        let head = as_table(table)?
            .t_head()
            .ok_or_else(|| TabletrimError::config("table has no header row"))?;
        let row = head
            .rows()
            .item(0)
            .and_then(|row| row.dyn_into::<HtmlTableRowElement>().ok())
            .ok_or_else(|| TabletrimError::config("table has no header row"))?;
        let cells = row.cells();
        let cells: Vec<WebElement> = (0..cells.length())
            .filter_map(|i| cells.item(i))
            .map(WebElement)
            .collect();
        if cells.is_empty() {
            return Err(TabletrimError::config("table header row has no cells"));
        }
        Ok(cells)
    }

    fn column_cells(&self, table: &WebElement, index: usize) -> Vec<WebElement> {
        let Ok(table) = as_table(table) else {
            return Vec::new();
        };
        let Some(position) = index.checked_sub(1).and_then(|i| u32::try_from(i).ok()) else {
            return Vec::new();
        };
        let rows = table.rows();
        (0..rows.length())
            .filter_map(|i| rows.item(i))
            .filter_map(|row| row.dyn_into::<HtmlTableRowElement>().ok())
            .filter_map(|row| row.cells().item(position))
            .map(WebElement)
            .collect()
    }

    fn create_element(&self, tag: &str) -> Result<WebElement> {
        self.document
            .create_element(tag)
            .map(WebElement)
            .map_err(|e| TabletrimError::environment(format!("create <{tag}>: {e:?}")))
    }

    fn listen(
        &self,
        target: &WebElement,
        event: &'static str,
        handler: Handler,
    ) -> Result<WebListener> {
        Self::add_listener(target.0.clone().into(), event, handler)
    }

    fn listen_viewport(&self, handler: Handler) -> Result<Vec<WebListener>> {
        ["resize", "scroll"]
            .into_iter()
            .map(|event| Self::add_listener(self.window.clone().into(), event, Rc::clone(&handler)))
            .collect()
    }

    fn create_callback(&self, handler: Handler) -> Closure<dyn FnMut()> {
        Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>)
    }

    fn set_timeout(&self, callback: &Closure<dyn FnMut()>, delay_ms: u32) -> Option<i32> {
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            )
            .ok()
    }

    fn clear_timeout(&self, timer: i32) {
        self.window.clear_timeout_with_handle(timer);
    }

    fn is_id_taken(&self, id: &str) -> bool {
        let selector = format!("table[{}=\"{id}\"]", classes::ID_ATTRIBUTE);
        matches!(self.document.query_selector(&selector), Ok(Some(_)))
    }
}
