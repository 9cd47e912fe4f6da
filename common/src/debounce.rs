//! Commit-after-inactivity bookkeeping for filter inputs.
//!
//! Each input event schedules a ticket; the timer that wakes up with the
//! latest ticket commits, older timers find their ticket stale and do
//! nothing. The timer itself lives with the caller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self { generation: 0, pending: None }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending value and invalidates earlier tickets.
    pub fn schedule(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    /// Takes the pending value if `ticket` is still the latest one.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_keystrokes_commit_once_with_last_value() {
        let mut debouncer = Debouncer::new();
        let tickets = ["a", "ap", "api"].map(|v| debouncer.schedule(v.to_string()));

        let commits = tickets.into_iter().filter_map(|t| debouncer.fire(t)).collect::<Vec<_>>();
        assert_eq!(commits, vec!["api".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn ticket_fires_only_once() {
        let mut debouncer = Debouncer::new();
        let ticket = debouncer.schedule(1);
        assert_eq!(debouncer.fire(ticket), Some(1));
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new();
        let ticket = debouncer.schedule(1);
        debouncer.cancel();
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn typing_after_cancel_commits_only_new_value() {
        let mut debouncer = Debouncer::new();
        let stale = debouncer.schedule("/ap");
        debouncer.cancel();
        let fresh = debouncer.schedule("/api");
        assert_eq!(debouncer.fire(stale), None);
        assert_eq!(debouncer.fire(fresh), Some("/api"));
    }
}
