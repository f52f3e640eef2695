//! [`StoreProxy`]: the host-side end of an executor channel.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
  },
  time::Instant,
};

use burrow_core::value::{Row, Value};
use tokio::{
  sync::{mpsc, oneshot},
  task::JoinHandle,
};

use crate::{
  Error, Result,
  executor::{self, Settings},
  protocol::{CorrelationId, Request, Response},
};

// ─── Activity ────────────────────────────────────────────────────────────────

/// What the executor's bump signals say about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
  /// Requests the executor has picked up.
  pub requests:     u64,
  /// When the most recent one was picked up.
  pub last_request: Option<Instant>,
}

// ─── Shared state ────────────────────────────────────────────────────────────

type Reply = oneshot::Sender<Result<Vec<Row>>>;

#[derive(Default)]
struct Pending {
  /// Set once the response channel has ended; nothing may be added after.
  closed: bool,
  calls:  HashMap<CorrelationId, Reply>,
}

/// State touched by both callers and the dispatcher task.
#[derive(Default)]
struct Shared {
  pending:      Mutex<Pending>,
  bumps:        AtomicU64,
  last_request: Mutex<Option<Instant>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
  fn bump(&self) {
    self.bumps.fetch_add(1, Ordering::Relaxed);
    *lock(&self.last_request) = Some(Instant::now());
  }

  fn resolve(&self, id: CorrelationId, result: Result<Vec<Row>>) {
    let Some(reply) = lock(&self.pending).calls.remove(&id) else {
      tracing::warn!(id, "response for unknown correlation id");
      return;
    };
    // The caller may have given up waiting; that is not our problem.
    let _ = reply.send(result);
  }

  /// Mark the channel closed and fail everything still waiting.
  fn fail_all(&self) -> usize {
    let calls = {
      let mut pending = lock(&self.pending);
      pending.closed = true;
      std::mem::take(&mut pending.calls)
    };
    let orphaned = calls.len();
    for (_, reply) in calls {
      let _ = reply.send(Err(Error::ChannelClosed));
    }
    orphaned
  }
}

async fn dispatch(shared: Arc<Shared>, mut responses: mpsc::UnboundedReceiver<Response>) {
  while let Some(response) = responses.recv().await {
    match response {
      Response::Bump => shared.bump(),
      Response::Rows { id, rows } => shared.resolve(id, Ok(rows)),
      Response::Error { id, detail } => shared.resolve(id, Err(detail.into())),
    }
  }
  let orphaned = shared.fail_all();
  tracing::debug!(orphaned, "executor channel closed");
}

// ─── Proxy ───────────────────────────────────────────────────────────────────

/// Issues queries to one executor and waits for their results.
///
/// Cloning is cheap; all clones share one channel and one pending table.
/// Dropping the last clone without calling [`close`](Self::close) also stops
/// the executor.
#[derive(Clone)]
pub struct StoreProxy {
  inner: Arc<Inner>,
}

struct Inner {
  requests:   mpsc::UnboundedSender<Request>,
  shared:     Arc<Shared>,
  next_id:    AtomicU64,
  closing:    AtomicBool,
  dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl StoreProxy {
  /// Start an executor and connect a proxy to it.
  pub(crate) async fn spawn(name: &str, settings: Settings) -> Result<Self> {
    let (requests, responses) = executor::spawn(name, settings).await?;
    Ok(Self::connect(requests, responses))
  }

  /// Wire a proxy to an existing pair of channel ends. Must be called from
  /// within a tokio runtime.
  pub(crate) fn connect(
    requests: mpsc::UnboundedSender<Request>,
    responses: mpsc::UnboundedReceiver<Response>,
  ) -> Self {
    let shared = Arc::new(Shared::default());
    let dispatcher = tokio::spawn(dispatch(Arc::clone(&shared), responses));
    Self {
      inner: Arc::new(Inner {
        requests,
        shared,
        next_id: AtomicU64::new(1),
        closing: AtomicBool::new(false),
        dispatcher: Mutex::new(Some(dispatcher)),
      }),
    }
  }

  /// Run `query` with positional `params` and collect every row.
  ///
  /// Suspends until the executor answers. Fails with
  /// [`Error::ChannelClosed`] if the executor is, or becomes, unreachable.
  pub async fn call(&self, query: &str, params: Vec<Value>) -> Result<Vec<Row>> {
    if self.inner.closing.load(Ordering::Acquire) {
      return Err(Error::ChannelClosed);
    }

    let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
    let (tx, rx) = oneshot::channel();
    {
      let mut pending = lock(&self.inner.shared.pending);
      if pending.closed {
        return Err(Error::ChannelClosed);
      }
      pending.calls.insert(id, tx);
    }

    let request = Request::All { id, query: query.to_owned(), params };
    if self.inner.requests.send(request).is_err() {
      lock(&self.inner.shared.pending).calls.remove(&id);
      return Err(Error::ChannelClosed);
    }

    rx.await.map_err(|_| Error::ChannelClosed)?
  }

  /// Ask the executor to close its connection and wait until it has.
  ///
  /// Calls queued before this one still complete; calls made afterwards fail
  /// with [`Error::ChannelClosed`]. Closing twice is harmless.
  pub async fn close(&self) -> Result<()> {
    self.inner.closing.store(true, Ordering::Release);
    // A send error means the executor already exited.
    let _ = self.inner.requests.send(Request::Close);

    let dispatcher = lock(&self.inner.dispatcher).take();
    if let Some(dispatcher) = dispatcher
      && let Err(e) = dispatcher.await
    {
      tracing::warn!(error = %e, "dispatcher task failed");
    }
    Ok(())
  }

  /// Whether calls on this proxy can still succeed.
  pub fn is_closed(&self) -> bool {
    self.inner.closing.load(Ordering::Acquire) || lock(&self.inner.shared.pending).closed
  }

  pub fn activity(&self) -> Activity {
    Activity {
      requests:     self.inner.shared.bumps.load(Ordering::Relaxed),
      last_request: *lock(&self.inner.shared.last_request),
    }
  }

  /// Number of calls waiting for a response.
  pub fn pending(&self) -> usize { lock(&self.inner.shared.pending).calls.len() }
}
