//! JavaScript API.
//!
//! Options are read from a plain object; function-valued `onInit`, `onTrim`,
//! `onUntrim`, `onActivate` and `onDeactivate` (or their all-lowercase
//! spellings) become hooks.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{WebElement, WebHost};
use crate::handle::TableTrim;
use crate::types::{Column, Hooks, Options};

/// A trimmed table, exported to JavaScript as `TableTrim`.
#[wasm_bindgen(js_name = TableTrim)]
pub struct JsTableTrim {
    inner: TableTrim<WebHost>,
}

#[wasm_bindgen(js_class = TableTrim)]
impl JsTableTrim {
    /// Take over `table` with the given options object.
    ///
    /// Hooks must not call back into this instance; see [`tabletrim`].
    ///
    /// # Errors
    /// Throws when the element is not a table with a header row or the
    /// options are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(table: web_sys::Element, options: JsValue) -> Result<JsTableTrim, JsValue> {
        console_error_panic_hook::set_once();

        let parsed = parse_options(&options)?;
        let hooks = parse_hooks(&options);
        let host = WebHost::new()?;
        let inner = TableTrim::new(host, WebElement::new(table), parsed, hooks)?;
        Ok(Self { inner })
    }

    /// Trim the table, optionally to a given column (1-based).
    ///
    /// Returns `false` when the table was already trimmed.
    pub fn trim(&self, index: Option<u32>) -> Result<bool, JsValue> {
        let index = index.map(to_index).transpose()?;
        Ok(self.inner.trim(index)?)
    }

    /// Return the table to its full layout. Returns `false` when it was not trimmed.
    pub fn untrim(&self) -> Result<bool, JsValue> {
        Ok(self.inner.untrim()?)
    }

    /// Show column `index` (1-based) next to the sticky column.
    pub fn activate(&self, index: u32) -> Result<(), JsValue> {
        self.inner.activate(to_index(index)?)?;
        Ok(())
    }

    /// Compare the table width with the breakpoint now, skipping the debounce.
    pub fn check(&self) -> Result<(), JsValue> {
        self.inner.check()?;
        Ok(())
    }

    /// Snapshot `{ state, active, next, prev, sticky, columns }`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.state()?;
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Generated table id, also stored in `data-tabletrimid`.
    pub fn id(&self) -> Result<String, JsValue> {
        Ok(self.inner.id()?)
    }

    /// Untrim, remove every listener and the widget markup.
    pub fn dispose(self) -> Result<(), JsValue> {
        self.inner.dispose()?;
        Ok(())
    }
}

/// Factory matching the classic `tabletrim(table, options)` call.
///
/// Hooks run while the table is mid-transition: calling any method of the
/// same `TableTrim` (including `state()`) from inside a hook throws
/// "Operation re-entered a running transition". Read what you need from the
/// hook arguments, or defer the call with `queueMicrotask`.
///
/// # Errors
/// Same as the `TableTrim` constructor.
#[wasm_bindgen]
pub fn tabletrim(table: web_sys::Element, options: JsValue) -> Result<JsTableTrim, JsValue> {
    JsTableTrim::new(table, options)
}

fn to_index(index: u32) -> Result<usize, JsValue> {
    usize::try_from(index).map_err(|_| JsValue::from_str("column index out of range"))
}

/// Options are read through JSON so that hook functions drop out.
fn parse_options(options: &JsValue) -> Result<Options, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Options::default());
    }
    let json: String = js_sys::JSON::stringify(options)?.into();
    serde_json::from_str(&json).map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))
}

fn parse_hooks(options: &JsValue) -> Hooks<WebElement> {
    let mut hooks = Hooks::new();
    if !options.is_object() {
        return hooks;
    }
    if let Some(f) = hook_function(options, &["onInit", "oninit"]) {
        hooks = hooks.on_init(table_hook(f));
    }
    if let Some(f) = hook_function(options, &["onTrim", "ontrim"]) {
        hooks = hooks.on_trim(table_hook(f));
    }
    if let Some(f) = hook_function(options, &["onUntrim", "onuntrim"]) {
        hooks = hooks.on_untrim(table_hook(f));
    }
    if let Some(f) = hook_function(options, &["onActivate", "onactivate"]) {
        hooks = hooks.on_activate(column_hook(f));
    }
    if let Some(f) = hook_function(options, &["onDeactivate", "ondeactivate"]) {
        hooks = hooks.on_deactivate(column_hook(f));
    }
    hooks
}

fn hook_function(options: &JsValue, names: &[&str]) -> Option<Function> {
    names.iter().find_map(|name| {
        Reflect::get(options, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    })
}

fn table_hook(f: Function) -> impl FnMut(&WebElement) {
    move |table: &WebElement| {
        if let Err(e) = f.call1(&JsValue::NULL, table.as_element()) {
            log::warn!("[tabletrim] hook threw: {e:?}");
        }
    }
}

fn column_hook(f: Function) -> impl FnMut(&WebElement, &Column<WebElement>) {
    move |table: &WebElement, column: &Column<WebElement>| {
        let column = column_object(column);
        if let Err(e) = f.call2(&JsValue::NULL, table.as_element(), &column) {
            log::warn!("[tabletrim] hook threw: {e:?}");
        }
    }
}

/// `{ index, title, headerCell, cells, bodyCells }` view of a column for hooks.
///
/// `cells` holds every cell of the column in row order; `bodyCells` leaves
/// out the cells inside `<thead>`.
fn column_object(column: &Column<WebElement>) -> JsValue {
    let object = Object::new();
    let index = u32::try_from(column.index).unwrap_or(u32::MAX);
    let cells = Array::new();
    let body_cells = Array::new();
    for cell in &column.cells {
        let element = cell.as_element();
        cells.push(element);
        if matches!(element.closest("thead"), Ok(None)) {
            body_cells.push(element);
        }
    }
    let fields: [(&str, JsValue); 5] = [
        ("index", JsValue::from(index)),
        ("title", JsValue::from_str(&column.title)),
        ("headerCell", JsValue::from(column.header_cell.as_element().clone())),
        ("cells", cells.into()),
        ("bodyCells", body_cells.into()),
    ];
    for (name, value) in fields {
        if Reflect::set(&object, &JsValue::from_str(name), &value).is_err() {
            log::warn!("[tabletrim] could not set column.{name}");
        }
    }
    object.into()
}
