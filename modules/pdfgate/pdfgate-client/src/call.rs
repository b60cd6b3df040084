//! Dual-mode call
//!
//! A [`PendingCall`] is an encoded request that has not been sent yet. It can
//! be driven once, either by awaiting it, by blocking the current thread, or
//! by enqueueing it on the client's worker pool with completion callbacks.
//! Cloning yields a fresh, unexecuted call with an identical request.
//!
//! Completion and cancellation are decided under one lock: once a cancel has
//! been requested, the call resolves to [`ClientError::Cancelled`] even if the
//! response already arrived.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::endpoint::Operation;
use crate::error::{ClientError, Result};
use crate::params::ResponseShape;
use crate::request::EncodedRequest;
use crate::response::ApiResponse;
use crate::runtime::WorkerPool;
use crate::transport::Transport;

/// Lifecycle phase of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Constructed, nothing sent
    Idle,
    /// Request in flight
    Executing,
    /// Finished with a response, an error, or a cancellation
    Completed,
}

#[derive(Debug)]
struct StateInner {
    phase: CallPhase,
    cancel_requested: bool,
}

#[derive(Debug)]
struct CallState {
    inner: Mutex<StateInner>,
    token: CancellationToken,
}

impl CallState {
    fn new() -> Self {
        Self {
            inner: Mutex::new(StateInner {
                phase: CallPhase::Idle,
                cancel_requested: false,
            }),
            token: CancellationToken::new(),
        }
    }

    fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.phase != CallPhase::Idle {
            return Err(ClientError::invalid(
                "call has already been executed; clone it to execute again",
            ));
        }
        inner.phase = CallPhase::Executing;
        Ok(())
    }

    fn request_cancel(&self) {
        let mut inner = self.inner.lock();
        if inner.phase == CallPhase::Completed {
            return;
        }
        inner.cancel_requested = true;
        drop(inner);
        self.token.cancel();
    }

    fn complete(&self, outcome: Result<ApiResponse>) -> Result<ApiResponse> {
        let mut inner = self.inner.lock();
        inner.phase = CallPhase::Completed;
        if inner.cancel_requested {
            return Err(ClientError::Cancelled);
        }
        outcome
    }

    fn abandon(&self) {
        let mut inner = self.inner.lock();
        if inner.phase == CallPhase::Completed {
            return;
        }
        inner.phase = CallPhase::Completed;
        inner.cancel_requested = true;
        drop(inner);
        self.token.cancel();
    }

    fn phase(&self) -> CallPhase {
        self.inner.lock().phase
    }

    fn is_cancelled(&self) -> bool {
        self.inner.lock().cancel_requested
    }
}

/// Marks the call completed-as-cancelled if the driving future is dropped
/// before it finishes.
struct CompletionGuard<'a> {
    state: &'a CallState,
    armed: bool,
}

impl CompletionGuard<'_> {
    fn finish(mut self, outcome: Result<ApiResponse>) -> Result<ApiResponse> {
        self.armed = false;
        self.state.complete(outcome)
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.abandon();
        }
    }
}

async fn drive(
    operation: Operation,
    transport: &Transport,
    request: &EncodedRequest,
    shape: ResponseShape,
    state: &CallState,
) -> Result<ApiResponse> {
    let guard = CompletionGuard { state, armed: true };
    debug!(
        operation = %operation,
        method = %request.method(),
        url = %request.url(),
        timeout_secs = request.timeout().as_secs(),
        "Dispatching PdfGate call"
    );

    let outcome = tokio::select! {
        biased;
        () = state.token.cancelled() => Err(ClientError::Cancelled),
        result = exchange(transport, request, shape) => result,
    };

    let outcome = guard.finish(outcome);
    match &outcome {
        Ok(response) => {
            debug!(operation = %operation, shape = %response.shape(), "PdfGate call completed");
        }
        Err(ClientError::Api(err)) => warn!(
            operation = %operation,
            status = ?err.status(),
            kind = ?err.kind(),
            error = %err,
            "PdfGate call failed"
        ),
        Err(err) => debug!(operation = %operation, error = %err, "PdfGate call did not complete"),
    }
    outcome
}

async fn exchange(
    transport: &Transport,
    request: &EncodedRequest,
    shape: ResponseShape,
) -> Result<ApiResponse> {
    let raw = transport.send(request).await?;
    debug!(
        status = raw.status().as_u16(),
        bytes = raw.body().len(),
        "PdfGate response received"
    );
    Ok(raw.decode(shape)?)
}

/// An encoded, not yet executed request.
#[derive(Debug)]
pub struct PendingCall {
    operation: Operation,
    request: EncodedRequest,
    shape: ResponseShape,
    transport: Transport,
    workers: WorkerPool,
    state: Arc<CallState>,
}

impl PendingCall {
    pub(crate) fn new(
        operation: Operation,
        request: EncodedRequest,
        shape: ResponseShape,
        transport: Transport,
        workers: WorkerPool,
    ) -> Self {
        Self {
            operation,
            request,
            shape,
            transport,
            workers,
            state: Arc::new(CallState::new()),
        }
    }

    /// Execute the call and await the decoded response.
    ///
    /// The exchange runs on the client's worker pool; dropping the returned
    /// future cancels it.
    ///
    /// # Errors
    /// [`ClientError::InvalidUsage`] if the call was already executed,
    /// [`ClientError::Api`] for remote, transport and decode failures, and
    /// [`ClientError::Cancelled`] if the call was cancelled.
    pub async fn execute(&self) -> Result<ApiResponse> {
        self.enqueue_future()?.await
    }

    /// Execute the call on the current thread, blocking until it completes or
    /// its timeout elapses.
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute); additionally
    /// [`ClientError::InvalidUsage`] when called from inside a current-thread
    /// runtime. In that case the call is left unexecuted. `spawn_blocking`
    /// threads and multi-thread runtime workers may block.
    pub fn execute_blocking(&self) -> Result<ApiResponse> {
        self.workers.block_on(async {
            self.state.start()?;
            drive(
                self.operation,
                &self.transport,
                &self.request,
                self.shape,
                &self.state,
            )
            .await
        })?
    }

    /// Schedule the call on the worker pool.
    ///
    /// Exactly one of the callbacks runs, once, on a worker thread after the
    /// exchange finishes. Cancellation is reported through `on_failure`.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] synchronously if the call was
    /// already executed; neither callback runs in that case.
    pub fn enqueue<S, F>(&self, on_success: S, on_failure: F) -> Result<()>
    where
        S: FnOnce(ApiResponse) + Send + 'static,
        F: FnOnce(ClientError) + Send + 'static,
    {
        self.dispatch(move |outcome| match outcome {
            Ok(response) => on_success(response),
            Err(err) => on_failure(err),
        })
    }

    /// Schedule the call and return a future resolving to its outcome.
    ///
    /// Dropping the future before it resolves cancels the call.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the call was already executed.
    pub fn enqueue_future(&self) -> Result<CallFuture> {
        let (sender, receiver) = oneshot::channel();
        self.dispatch(move |outcome| {
            if sender.send(outcome).is_err() {
                debug!("Call future dropped before completion");
            }
        })?;
        Ok(CallFuture {
            receiver,
            state: Arc::clone(&self.state),
        })
    }

    fn dispatch<D>(&self, deliver: D) -> Result<()>
    where
        D: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        self.state.start()?;
        let operation = self.operation;
        let shape = self.shape;
        let transport = self.transport.clone();
        let request = self.request.clone();
        let state = Arc::clone(&self.state);
        self.workers.spawn(async move {
            let outcome = drive(operation, &transport, &request, shape, &state).await;
            deliver(outcome);
        });
        Ok(())
    }

    /// Request cancellation.
    ///
    /// No effect once the call has completed. Otherwise the call resolves to
    /// [`ClientError::Cancelled`], including when it has not started yet.
    pub fn cancel(&self) {
        self.state.request_cancel();
    }

    /// Whether an execution has been started
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.state.phase() != CallPhase::Idle
    }

    /// Whether cancellation was requested before completion
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    #[must_use]
    pub fn phase(&self) -> CallPhase {
        self.state.phase()
    }

    /// The encoded request this call sends
    #[must_use]
    pub const fn request(&self) -> &EncodedRequest {
        &self.request
    }

    /// How the response body will be decoded
    #[must_use]
    pub const fn response_shape(&self) -> ResponseShape {
        self.shape
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}

impl Clone for PendingCall {
    /// A fresh, unexecuted call with the same request.
    fn clone(&self) -> Self {
        Self::new(
            self.operation,
            self.request.clone(),
            self.shape,
            self.transport.clone(),
            self.workers.clone(),
        )
    }
}

/// Outcome of an enqueued call as a future.
#[derive(Debug)]
pub struct CallFuture {
    receiver: oneshot::Receiver<Result<ApiResponse>>,
    state: Arc<CallState>,
}

impl CallFuture {
    /// Request cancellation of the underlying call
    pub fn cancel(&self) {
        self.state.request_cancel();
    }
}

impl Future for CallFuture {
    type Output = Result<ApiResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ClientError::Cancelled)))
    }
}

impl Drop for CallFuture {
    fn drop(&mut self) {
        self.state.request_cancel();
    }
}
