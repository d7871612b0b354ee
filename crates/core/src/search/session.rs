//! Per-client search session.
//!
//! A session owns one client's view. Keystrokes go through a [`Debouncer`];
//! each debounced query starts a search tagged with a new generation, and a
//! completion is applied only if its generation is still the latest one.
//! Older searches are never cancelled, their results are just dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use super::{Debouncer, SearchCoordinator, SessionView};
use crate::metrics::STALE_RESPONSES_DISCARDED;

const INPUT_BUFFER: usize = 64;

/// Handle to a running session.
pub struct SessionHandle {
    input: mpsc::Sender<String>,
    view: watch::Receiver<SessionView>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Feed the current search box contents.
    ///
    /// Returns false if the session has stopped.
    pub async fn input(&self, query: impl Into<String>) -> bool {
        self.input.send(query.into()).await.is_ok()
    }

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Snapshot of the current view.
    pub fn current(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Stop accepting input and wait for in-flight searches to settle.
    pub async fn close(self) {
        drop(self.input);
        let _ = self.task.await;
    }
}

/// Start a session: the popular listing and the trending panel load
/// immediately, then input is searched after `debounce`.
pub fn spawn_session(coordinator: Arc<SearchCoordinator>, debounce: Duration) -> SessionHandle {
    let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER);

    let mut initial = SessionView::default();
    initial.trending.loading = true;
    initial.search.begin("", 0);
    let (view_tx, view_rx) = watch::channel(initial);

    let task = tokio::spawn(run(coordinator, debounce, input_rx, Arc::new(view_tx)));

    SessionHandle {
        input: input_tx,
        view: view_rx,
        task,
    }
}

async fn run(
    coordinator: Arc<SearchCoordinator>,
    debounce: Duration,
    input: mpsc::Receiver<String>,
    view: Arc<watch::Sender<SessionView>>,
) {
    let (debounced_tx, mut debounced_rx) = mpsc::channel(INPUT_BUFFER);
    let debouncer =
        tokio::spawn(Debouncer::new(debounce).starting_from("").run(input, debounced_tx));

    let mut tasks = JoinSet::new();

    // Trending panel is loaded once per session
    {
        let coordinator = Arc::clone(&coordinator);
        let view = Arc::clone(&view);
        tasks.spawn(async move {
            let records = coordinator.trending().await;
            view.send_modify(|v| {
                v.trending.loading = false;
                v.trending.records = records;
            });
        });
    }

    // generation 0 was marked as begun in spawn_session
    spawn_search(&mut tasks, &coordinator, &view, String::new(), 0);

    let mut generation = 0;
    while let Some(query) = debounced_rx.recv().await {
        generation += 1;
        view.send_modify(|v| v.search.begin(&query, generation));
        spawn_search(&mut tasks, &coordinator, &view, query, generation);
        while tasks.try_join_next().is_some() {}
    }

    let _ = debouncer.await;
    while tasks.join_next().await.is_some() {}
    debug!("Search session ended after {} searches", generation + 1);
}

fn spawn_search(
    tasks: &mut JoinSet<()>,
    coordinator: &Arc<SearchCoordinator>,
    view: &Arc<watch::Sender<SessionView>>,
    query: String,
    generation: u64,
) {
    let coordinator = Arc::clone(coordinator);
    let view = Arc::clone(view);

    tasks.spawn(async move {
        let result = coordinator.search(&query).await;
        let applied = view.send_if_modified(|v| {
            if v.search.generation != generation {
                return false;
            }
            v.search.complete(result);
            true
        });

        if !applied {
            STALE_RESPONSES_DISCARDED.inc();
            debug!(
                "Discarded stale results for '{}' (generation {})",
                query, generation
            );
        }
    });
}
