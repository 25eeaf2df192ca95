//! Revocable background tasks, one slot per kind of request.
//!
//! Starting a task in an occupied slot aborts the previous one, so a
//! debounced autocomplete is a sleep followed by the request inside a single
//! task: new input replaces the task and the timer restarts.

use std::{collections::HashMap, future::Future, time::Duration};

use tokio::{sync::mpsc, task::AbortHandle};

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Suggestions,
    Weather,
}

#[derive(Debug)]
pub struct TaskManager {
    tasks: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tasks: HashMap::new(), action_tx }
    }

    /// Spawn `future`, aborting whatever occupied `key`. Its action is sent
    /// back unless the task is aborted first.
    pub fn spawn<F>(&mut self, key: TaskKey, future: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.cancel(key);

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });

        self.tasks.insert(key, handle.abort_handle());
    }

    /// Like [`spawn`](Self::spawn), but only starts `future` after `delay`
    /// has passed without another call for the same key.
    pub fn debounce<F>(&mut self, key: TaskKey, delay: Duration, future: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::sleep(delay).await;
            future.await
        });
    }

    pub fn cancel(&mut self, key: TaskKey) {
        if let Some(handle) = self.tasks.remove(&key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
