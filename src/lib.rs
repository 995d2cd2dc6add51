//! tabletrim - responsive column trimming for wide HTML tables
//!
//! On narrow viewports a managed table collapses to two columns:
//! - a sticky column that always stays visible
//! - one active column the user switches with a selector or prev/next buttons
//!
//! The state machine in [`controller`] is DOM-library independent; it talks to
//! the page through the [`dom::Element`] and [`dom::Host`] traits. The browser
//! binding lives in `web` (wasm32 only) and an in-memory host in
//! [`dom::memory`].
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { tabletrim } from 'tabletrim';
//! await init();
//! const tt = tabletrim(table, { controls: ['prev', 'select', 'next'], breakpoint: 640 });
//! tt.activate(3);
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use tabletrim::dom::memory::MemoryHost;
//! use tabletrim::{Hooks, Options, TableTrim};
//!
//! let host = MemoryHost::new();
//! let table = host.table(&["Name", "Q1", "Q2"], &[vec!["Ann", "4", "7"]]);
//! let tt = TableTrim::new(host, table, Options::default(), Hooks::new())?;
//! tt.trim(None)?;
//! tt.activate(3)?;
//! assert_eq!(tt.state()?.active, Some(3));
//! # Ok::<(), tabletrim::TabletrimError>(())
//! ```

pub mod controller;
pub mod dom;
pub mod error;
pub mod handle;
pub mod monitor;
pub mod registry;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use controller::{Controller, NavIndexes, TrimSnapshot, TrimState};
pub use error::{Result, TabletrimError};
pub use handle::TableTrim;
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
