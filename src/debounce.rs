use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// One-shot timer owned by a [`Debouncer`]. Dropping it must cancel the action.
pub trait DebounceTimer: 'static {
    fn start(delay_ms: u32, action: impl FnOnce() + 'static) -> Self;
}

impl DebounceTimer for Timeout {
    fn start(delay_ms: u32, action: impl FnOnce() + 'static) -> Self {
        Timeout::new(delay_ms, action)
    }
}

/// Runs only the most recently scheduled action, once `delay_ms` pass without
/// another call. Each call restarts the wait.
pub struct Debouncer<T: DebounceTimer = Timeout> {
    delay_ms: u32,
    pending: Rc<RefCell<Option<T>>>,
}

impl<T: DebounceTimer> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            delay_ms: self.delay_ms,
            pending: Rc::clone(&self.pending),
        }
    }
}

impl Debouncer {
    #[must_use]
    pub fn new(delay_ms: u32) -> Self {
        Self::with_timer(delay_ms)
    }
}

impl<T: DebounceTimer> Debouncer<T> {
    #[must_use]
    pub fn with_timer(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn schedule(&self, action: impl FnOnce() + 'static) {
        let timer = T::start(self.delay_ms, action);
        // Replacing drops, and so cancels, the previous timer; a fired one stays stored until replaced
        self.pending.borrow_mut().replace(timer);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Weak;

    type Slot = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

    thread_local! {
        static STARTED: RefCell<Vec<(u32, Weak<RefCell<Option<Box<dyn FnOnce()>>>>)>> = const { RefCell::new(Vec::new()) };
    }

    /// Timer driven by hand; a dropped timer can no longer fire
    struct ManualTimer {
        _slot: Slot,
    }

    impl DebounceTimer for ManualTimer {
        fn start(delay_ms: u32, action: impl FnOnce() + 'static) -> Self {
            let action: Box<dyn FnOnce()> = Box::new(action);
            let slot: Slot = Rc::new(RefCell::new(Some(action)));
            STARTED.with(|started| started.borrow_mut().push((delay_ms, Rc::downgrade(&slot))));
            Self { _slot: slot }
        }
    }

    /// Fire every timer that is still alive, returning how many ran
    fn fire_elapsed() -> usize {
        let slots: Vec<_> = STARTED.with(|started| started.borrow_mut().drain(..).collect());
        let mut fired = 0;
        for (_, slot) in slots {
            let action = slot.upgrade().and_then(|slot| slot.borrow_mut().take());
            if let Some(action) = action {
                action();
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_each_call_restarts_the_wait() {
        let debouncer = Debouncer::<ManualTimer>::with_timer(300);
        let last = Rc::new(Cell::new(""));

        for query in ["b", "ba", "bac"] {
            let last = Rc::clone(&last);
            debouncer.schedule(move || last.set(query));
        }

        assert_eq!(fire_elapsed(), 1);
        assert_eq!(last.get(), "bac");
    }

    #[test]
    fn test_uses_configured_delay() {
        let debouncer = Debouncer::<ManualTimer>::with_timer(300);
        debouncer.schedule(|| {});
        let delay = STARTED.with(|started| started.borrow().last().map(|(delay, _)| *delay));
        assert_eq!(delay, Some(300));
        fire_elapsed();
    }

    #[test]
    fn test_cancel_drops_pending_action() {
        let debouncer = Debouncer::<ManualTimer>::with_timer(300);
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        debouncer.schedule(move || flag.set(true));
        debouncer.cancel();

        assert_eq!(fire_elapsed(), 0);
        assert!(!ran.get());
    }

    #[test]
    fn test_clones_share_the_pending_action() {
        let debouncer = Debouncer::<ManualTimer>::with_timer(300);
        let other = debouncer.clone();
        let runs = Rc::new(Cell::new(0));

        let first = Rc::clone(&runs);
        debouncer.schedule(move || first.set(first.get() + 1));
        let second = Rc::clone(&runs);
        other.schedule(move || second.set(second.get() + 10));

        fire_elapsed();
        assert_eq!(runs.get(), 10);
    }
}
