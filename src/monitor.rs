//! Debounced viewport monitor.
//!
//! Every viewport signal re-arms a single timer; only the last signal inside a
//! quiet period of `lag` milliseconds leads to a width check.

use crate::dom::Host;

pub struct ViewportMonitor<H: Host> {
    lag_ms: u32,
    callback: Option<H::Callback>,
    pending: Option<H::TimerId>,
}

impl<H: Host> ViewportMonitor<H> {
    pub fn new(lag_ms: u32) -> Self {
        Self {
            lag_ms,
            callback: None,
            pending: None,
        }
    }

    /// Install the callback run when the quiet period ends. Created once and reused.
    pub fn set_callback(&mut self, callback: H::Callback) {
        self.callback = Some(callback);
    }

    /// Record a viewport signal: cancel the pending timer and arm a new one.
    pub fn signal(&mut self, host: &H) {
        self.cancel(host);
        let Some(callback) = &self.callback else {
            return;
        };
        self.pending = host.set_timeout(callback, self.lag_ms);
        if self.pending.is_none() {
            log::warn!("[tabletrim] could not arm the viewport timer");
        }
    }

    /// The armed timer fired.
    pub fn settle(&mut self) {
        self.pending = None;
    }

    pub fn cancel(&mut self, host: &H) {
        if let Some(timer) = self.pending.take() {
            host.clear_timeout(timer);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_monitor(host: &MemoryHost, lag: u32) -> (ViewportMonitor<MemoryHost>, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut monitor = ViewportMonitor::new(lag);
        monitor.set_callback(host.create_callback(Rc::new(move || counter.set(counter.get() + 1))));
        (monitor, fired)
    }

    #[test]
    fn test_burst_of_signals_fires_once() {
        let host = MemoryHost::new();
        let (mut monitor, fired) = counting_monitor(&host, 100);

        monitor.signal(&host);
        host.advance(60);
        monitor.signal(&host);
        host.advance(60);
        monitor.signal(&host);
        assert_eq!(fired.get(), 0);
        assert_eq!(host.pending_timers(), 1);

        host.advance(100);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_cancel_drops_pending_timer() {
        let host = MemoryHost::new();
        let (mut monitor, fired) = counting_monitor(&host, 50);

        monitor.signal(&host);
        assert!(monitor.is_pending());
        monitor.cancel(&host);
        assert!(!monitor.is_pending());
        host.advance(100);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_signal_without_callback_is_ignored() {
        let host = MemoryHost::new();
        let mut monitor: ViewportMonitor<MemoryHost> = ViewportMonitor::new(10);
        monitor.signal(&host);
        assert!(!monitor.is_pending());
        assert_eq!(host.pending_timers(), 0);
    }
}
