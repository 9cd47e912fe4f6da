use dioxus::core::Task;
use dioxus::prelude::*;
use explorer_common::debounce::Debouncer;
use gloo_timers::future::TimeoutFuture;

/// Commits the last value scheduled within `delay_ms`; earlier ones are dropped.
/// At most one timer task is alive per input.
pub struct DebouncedCommit<T: 'static> {
    debouncer: Signal<Debouncer<T>>,
    task: Signal<Option<Task>>,
    delay_ms: u32,
    commit: Callback<T>,
}

impl<T: 'static> Clone for DebouncedCommit<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for DebouncedCommit<T> {}

impl<T: 'static> DebouncedCommit<T> {
    fn cancel_task(&self) {
        let mut task = self.task;
        let previous = task.write().take();
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    pub fn schedule(&self, value: T) {
        self.cancel_task();
        let mut debouncer = self.debouncer;
        let ticket = debouncer.write().schedule(value);
        let delay_ms = self.delay_ms;
        let commit = self.commit;
        let mut task = self.task;
        let handle = spawn(async move {
            TimeoutFuture::new(delay_ms).await;
            task.set(None);
            let fired = debouncer.write().fire(ticket);
            if let Some(value) = fired {
                commit.call(value);
            }
        });
        task.set(Some(handle));
    }

    /// Drops the pending value and its timer.
    pub fn cancel(&self) {
        self.cancel_task();
        let mut debouncer = self.debouncer;
        debouncer.write().cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.read().is_pending()
    }
}

pub fn use_debounced_commit<T: 'static>(delay_ms: u32, commit: impl FnMut(T) + 'static) -> DebouncedCommit<T> {
    let debouncer = use_signal(Debouncer::<T>::new);
    let task = use_signal(|| None::<Task>);
    let commit = use_callback(commit);
    use_drop(move || {
        if let Some(task) = *task.peek() {
            task.cancel();
        }
    });
    DebouncedCommit { debouncer, task, delay_ms, commit }
}
