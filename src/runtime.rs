//! Async driver for [`QueryStateController`].
//!
//! [`QueryHandle`] owns the controller for the life of one list view. Every
//! change of the effective query is published on a `watch` channel, which a
//! data-fetch task can treat as its sole dependency. The search debounce
//! timer is a spawned `tokio` task that sleeps until the deadline and then
//! commits by generation, so a timer that lost the race to a newer keystroke
//! or to disposal commits nothing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::controller::{ControllerResult, QueryStateController, TableEvent};
use crate::debounce::Generation;
use crate::domain::query::{EffectiveQuery, QueryState, SortDescriptor};
use crate::domain::types::FilterKey;

struct Shared {
    controller: Mutex<QueryStateController>,
    publisher: watch::Sender<EffectiveQuery>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueryStateController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes the current effective query if it differs from the last one.
    fn publish(&self, controller: &QueryStateController) {
        if controller.is_disposed() {
            return;
        }
        let query = controller.effective_query();
        self.publisher.send_if_modified(|current| {
            if *current == query {
                false
            } else {
                *current = query;
                true
            }
        });
    }
}

pub struct QueryHandle {
    shared: Arc<Shared>,
    timer: Mutex<Option<(Generation, JoinHandle<()>)>>,
}

impl QueryHandle {
    /// Takes ownership of `controller`. Must be called within a `tokio`
    /// runtime; the debounce timer is spawned onto it.
    pub fn new(controller: QueryStateController) -> Self {
        let (publisher, _) = watch::channel(controller.effective_query());
        Self {
            shared: Arc::new(Shared {
                controller: Mutex::new(controller),
                publisher,
            }),
            timer: Mutex::new(None),
        }
    }

    /// Receiver of effective queries; the current value is available
    /// immediately via [`watch::Receiver::borrow`].
    pub fn subscribe(&self) -> watch::Receiver<EffectiveQuery> {
        self.shared.publisher.subscribe()
    }

    pub fn effective_query(&self) -> EffectiveQuery {
        self.shared.lock().effective_query()
    }

    pub fn state(&self) -> QueryState {
        self.shared.lock().state().clone()
    }

    pub fn set_search(&self, text: &str) -> ControllerResult<()> {
        let armed = {
            let mut controller = self.shared.lock();
            let now = Instant::now().into_std();
            controller
                .set_search(text, now)?
                .zip(controller.search_deadline())
        };
        if let Some((generation, deadline)) = armed {
            self.arm(generation, Instant::from_std(deadline));
        }
        Ok(())
    }

    pub fn set_filter(&self, key: FilterKey, value: &str) -> ControllerResult<()> {
        self.update(|controller| controller.set_filter(key, value))
    }

    pub fn change_page(&self, page: usize) -> ControllerResult<()> {
        self.update(|controller| controller.change_page(page))
    }

    pub fn change_page_size(&self, input: &str) -> ControllerResult<()> {
        self.update(|controller| controller.change_page_size(input))
    }

    pub fn change_sort(&self, model: &[SortDescriptor]) -> ControllerResult<()> {
        self.update(|controller| controller.change_sort(model))
    }

    pub fn clamp_page(&self, page_count: usize) -> ControllerResult<bool> {
        self.update(|controller| controller.clamp_page(page_count))
    }

    pub fn apply(&self, event: TableEvent) -> ControllerResult<()> {
        match event {
            TableEvent::Search { text } => self.set_search(&text),
            TableEvent::Filter { key, value } => self.set_filter(key, &value),
            TableEvent::Page { page } => self.change_page(page),
            TableEvent::PageSize { value } => self.change_page_size(&value),
            TableEvent::Sort { model } => self.change_sort(&model),
        }
    }

    /// Cancels any pending search and stops all further publication.
    pub fn dispose(&self) {
        self.cancel_timer();
        self.shared.lock().dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.lock().is_disposed()
    }

    fn update<R>(
        &self,
        op: impl FnOnce(&mut QueryStateController) -> ControllerResult<R>,
    ) -> ControllerResult<R> {
        let mut controller = self.shared.lock();
        let result = op(&mut controller)?;
        self.shared.publish(&controller);
        Ok(result)
    }

    /// Spawns the timer for `generation` unless a newer arming already holds
    /// the slot. Two `set_search` calls racing on different threads may reach
    /// this point out of order.
    fn arm(&self, generation: Generation, deadline: Instant) {
        let mut slot = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(armed, _)| *armed > generation) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut controller = shared.lock();
            match controller.commit_search(generation) {
                Ok(true) => shared.publish(&controller),
                Ok(false) => {}
                Err(err) => log::debug!("Dropping debounced search: {err}"),
            }
        });

        if let Some((_, previous)) = slot.replace((generation, task)) {
            previous.abort();
        }
    }

    fn cancel_timer(&self) {
        if let Some((_, task)) = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
