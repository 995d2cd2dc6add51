//! Public handle around a [`Controller`].
//!
//! The controller lives behind `Rc<RefCell<_>>` so that control widgets and
//! the viewport monitor can reach it from event handlers. Handlers hold weak
//! references; dropping the handle drops the controller, which unregisters
//! every listener.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::controller::{Controller, TrimSnapshot};
use crate::dom::{Element, Host};
use crate::error::{Result, TabletrimError};
use crate::types::{Hooks, Options};

type Shared<H> = Rc<RefCell<Controller<H>>>;

/// A trimmed-table widget bound to one table element.
pub struct TableTrim<H: Host> {
    inner: Shared<H>,
}

impl<H: Host> TableTrim<H> {
    /// Take over `table`: build the column registry and controls, bind the
    /// control and viewport listeners, run `on_init`, then check the width once.
    ///
    /// # Errors
    /// Configuration error for a malformed table or invalid options;
    /// environment error when the host refuses an element or listener.
    pub fn new(host: H, table: H::Element, options: Options, hooks: Hooks<H::Element>) -> Result<Self> {
        let controller = Controller::new(host, table, options, hooks)?;
        let inner = Rc::new(RefCell::new(controller));
        bind_controls(&inner)?;
        bind_viewport(&inner)?;

        let handle = Self { inner };
        {
            let mut controller = handle.controller_mut()?;
            controller.fire_init();
            controller.check()?;
        }
        Ok(handle)
    }

    /// Trim the table, showing `index` (default: the configured initial column).
    ///
    /// Returns `Ok(false)` if the table was already trimmed.
    ///
    /// # Errors
    /// [`TabletrimError::InvalidColumn`] for an index outside the table.
    pub fn trim(&self, index: Option<usize>) -> Result<bool> {
        self.controller_mut()?.trim(index)
    }

    /// Untrim the table. Returns `Ok(false)` if it was not trimmed.
    ///
    /// # Errors
    /// [`TabletrimError::Reentrant`] when called from inside a hook.
    pub fn untrim(&self) -> Result<bool> {
        Ok(self.controller_mut()?.untrim())
    }

    /// Show column `index`.
    ///
    /// # Errors
    /// [`TabletrimError::InvalidColumn`] for an index outside the table.
    pub fn activate(&self, index: usize) -> Result<()> {
        self.controller_mut()?.activate(index)
    }

    /// Compare the current width with the breakpoint right away.
    ///
    /// # Errors
    /// [`TabletrimError::Reentrant`] when called from inside a hook.
    pub fn check(&self) -> Result<()> {
        self.controller_mut()?.check()
    }

    /// # Errors
    /// [`TabletrimError::Reentrant`] when called from inside a hook.
    pub fn state(&self) -> Result<TrimSnapshot> {
        Ok(self.controller()?.snapshot())
    }

    /// # Errors
    /// [`TabletrimError::Reentrant`] when called from inside a hook.
    pub fn id(&self) -> Result<String> {
        Ok(self.controller()?.id().to_string())
    }

    /// Untrim, unbind every listener and remove the widget markup.
    ///
    /// # Errors
    /// [`TabletrimError::Reentrant`] when called from inside a hook.
    pub fn dispose(self) -> Result<()> {
        self.controller_mut()?.dispose();
        Ok(())
    }

    fn controller(&self) -> Result<Ref<'_, Controller<H>>> {
        self.inner
            .try_borrow()
            .map_err(|_| TabletrimError::Reentrant)
    }

    fn controller_mut(&self) -> Result<RefMut<'_, Controller<H>>> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| TabletrimError::Reentrant)
    }
}

/// Run `f` on the controller behind `weak` from an event handler.
fn dispatch<H: Host>(weak: &Weak<RefCell<Controller<H>>>, f: impl FnOnce(&mut Controller<H>) -> Result<()>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let Ok(mut controller) = inner.try_borrow_mut() else {
        log::warn!("[tabletrim] event ignored while a transition is running");
        return;
    };
    if let Err(e) = f(&mut controller) {
        log::warn!("[tabletrim] event handler failed: {e}");
    }
}

fn bind_controls<H: Host>(inner: &Shared<H>) -> Result<()> {
    let mut controller = inner.try_borrow_mut().map_err(|_| TabletrimError::Reentrant)?;
    let Some(controls) = controller.controls().cloned() else {
        return Ok(());
    };
    let mut listeners = Vec::new();

    if let Some(select) = &controls.select {
        let weak = Rc::downgrade(inner);
        let source = select.clone();
        listeners.push(controller.host.listen(
            select,
            "change",
            Rc::new(move || {
                let value = source.value();
                match value.trim().parse::<usize>() {
                    Ok(index) => dispatch(&weak, |c| c.activate(index)),
                    Err(_) => log::warn!("[tabletrim] ignoring selector value {value:?}"),
                }
            }),
        )?);
    }
    if let Some(prev) = &controls.prev {
        let weak = Rc::downgrade(inner);
        listeners.push(controller.host.listen(
            prev,
            "click",
            Rc::new(move || {
                dispatch(&weak, |c| {
                    let target = c.prev_index();
                    c.activate(target)
                })
            }),
        )?);
    }
    if let Some(next) = &controls.next {
        let weak = Rc::downgrade(inner);
        listeners.push(controller.host.listen(
            next,
            "click",
            Rc::new(move || {
                dispatch(&weak, |c| {
                    let target = c.next_index();
                    c.activate(target)
                })
            }),
        )?);
    }

    controller.listeners.extend(listeners);
    Ok(())
}

fn bind_viewport<H: Host>(inner: &Shared<H>) -> Result<()> {
    let mut controller = inner.try_borrow_mut().map_err(|_| TabletrimError::Reentrant)?;

    let weak = Rc::downgrade(inner);
    let callback = controller.host.create_callback(Rc::new(move || {
        dispatch(&weak, |c| {
            c.monitor.settle();
            c.check()
        })
    }));
    controller.monitor.set_callback(callback);

    let weak = Rc::downgrade(inner);
    let listeners = controller.host.listen_viewport(Rc::new(move || {
        dispatch(&weak, |c| {
            c.schedule_check();
            Ok(())
        })
    }))?;
    controller.listeners.extend(listeners);
    Ok(())
}
