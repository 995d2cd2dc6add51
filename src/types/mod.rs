//! Data types shared by the controller and its hosts.

pub mod classes;
mod column;
mod hooks;
mod options;

pub use column::*;
pub use hooks::*;
pub use options::*;
