//! Running a profile lookup off the interface thread.
//!
//! A lookup blocks on network I/O, so it runs on a *work* context and its
//! outcome is handed to a *delivery* context, usually the thread that owns
//! the user interface. Both are passed in explicitly:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! use qiita::client::QiitaClient;
//! use qiita::dispatch::{MainQueue, request_profile};
//!
//! let client = QiitaClient::default();
//! let mut ui = MainQueue::new();
//!
//! request_profile(
//!     &client,
//!     "Yuritani",
//!     "ACCESS_TOKEN",
//!     &tokio::runtime::Handle::current(),
//!     ui.sender(),
//!     |outcome| match outcome {
//!         Ok(profile) => println!("{:?}", profile.display_rows()),
//!         Err(e) => println!("no data: {e}"),
//!     },
//! );
//!
//! // inside the interface loop
//! ui.run_next().await;
//! # }
//! ```
//!
//! There is no cancellation. A result whose delivery context has gone away is
//! dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use qiita_common::http_client::HttpClient;
use tokio::sync::mpsc;

use crate::ProfileError;
use crate::api::users::Profile;
use crate::client::QiitaClient;

/// Boxed unit of background work.
pub type Work = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Boxed callback run on the delivery context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere background work can run.
pub trait WorkContext {
    /// Start `work` without waiting for it.
    fn spawn_work(&self, work: Work);
}

impl WorkContext for tokio::runtime::Handle {
    fn spawn_work(&self, work: Work) {
        // detached, the outcome travels through the delivery context
        drop(self.spawn(work));
    }
}

/// Somewhere a finished request reports back to.
pub trait DeliveryContext: Send + 'static {
    /// Schedule `job` on this context. Dropped silently if the context is gone.
    fn deliver(&self, job: Job);
}

impl DeliveryContext for tokio::runtime::Handle {
    fn deliver(&self, job: Job) {
        drop(self.spawn(async move { job() }));
    }
}

/// Queue of callbacks drained by the thread that owns it.
///
/// Models an interface event loop: results arrive through any number of
/// [`MainSender`]s and only run when the owner calls [`run_pending`] or
/// [`run_next`].
///
/// [`run_pending`]: MainQueue::run_pending
/// [`run_next`]: MainQueue::run_next
pub struct MainQueue {
    tx: mpsc::UnboundedSender<Job>,
    rx: mpsc::UnboundedReceiver<Job>,
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MainQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A delivery handle feeding this queue
    pub fn sender(&self) -> MainSender {
        MainSender {
            tx: self.tx.clone(),
        }
    }

    /// Run every callback already queued, returning how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next callback and run it.
    pub async fn run_next(&mut self) {
        // the queue keeps its own sender, so the channel never closes here
        if let Some(job) = self.rx.recv().await {
            job();
        }
    }
}

/// Cloneable delivery handle for a [`MainQueue`].
#[derive(Clone)]
pub struct MainSender {
    tx: mpsc::UnboundedSender<Job>,
}

impl DeliveryContext for MainSender {
    fn deliver(&self, job: Job) {
        if self.tx.send(job).is_err() {
            #[cfg(feature = "tracing")]
            tracing::debug!("delivery queue closed, discarding result");
        }
    }
}

/// Lifecycle of one request. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestState {
    /// Handed to the work context, not started yet
    Idle = 0,
    /// Network round trip or decode in progress
    InFlight = 1,
    /// Outcome produced and handed to the delivery context
    Resolved = 2,
}

/// Observer for a running request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    state: Arc<AtomicU8>,
}

impl RequestHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RequestState::Idle as u8)),
        }
    }

    fn advance(&self, to: RequestState) {
        self.state.fetch_max(to as u8, Ordering::AcqRel);
    }

    /// Current state
    pub fn state(&self) -> RequestState {
        match self.state.load(Ordering::Acquire) {
            0 => RequestState::Idle,
            1 => RequestState::InFlight,
            _ => RequestState::Resolved,
        }
    }

    /// True once the outcome has been produced
    pub fn is_resolved(&self) -> bool {
        self.state() == RequestState::Resolved
    }
}

/// Look up a profile on `work` and report the outcome on `deliver`.
///
/// `on_result` runs exactly once, on the delivery context, unless that
/// context is gone by the time the request resolves.
pub fn request_profile<C, W, D, F>(
    client: &QiitaClient<C>,
    username: impl Into<String>,
    access_token: impl Into<String>,
    work: &W,
    deliver: D,
    on_result: F,
) -> RequestHandle
where
    C: HttpClient + Clone + Send + Sync + 'static,
    W: WorkContext + ?Sized,
    D: DeliveryContext,
    F: FnOnce(Result<Profile, ProfileError>) + Send + 'static,
{
    let client = client.clone();
    let username = username.into();
    let access_token = access_token.into();
    let handle = RequestHandle::new();
    let state = handle.clone();

    work.spawn_work(Box::pin(async move {
        state.advance(RequestState::InFlight);
        let outcome = client.get_profile(&username, &access_token).await;
        state.advance(RequestState::Resolved);
        deliver.deliver(Box::new(move || on_result(outcome)));
    }));

    handle
}
