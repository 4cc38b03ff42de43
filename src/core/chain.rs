//! Execution and Chaining
//!
//! [`Execute`] is implemented by everything that resolves into one terminal
//! outcome: single requests, authentication requests and composites. Steps
//! are chained with [`Execute::and_then`]: the next step is built from the
//! previous step's success value and is only started once that value exists.
//! The first failure ends the chain and is returned unchanged. Steps that
//! already succeeded are not rolled back.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AuthResult, RequestError};

/// Something that can be fired once and resolves into a typed outcome.
#[async_trait]
pub trait Execute: Send + Sized {
    /// Success value.
    type Output: Send + 'static;

    /// Perform the call(s) and wait for the outcome.
    async fn execute(self) -> AuthResult<Self::Output>;

    /// Run `continuation` with this step's success value and execute the
    /// step it returns. Nothing past this step is started on failure.
    fn and_then<F, N>(self, continuation: F) -> AndThen<Self, F>
    where
        F: FnOnce(Self::Output) -> N + Send,
        N: Execute,
    {
        AndThen {
            first: self,
            continuation,
        }
    }

    /// Transform the success value.
    fn map<F, U>(self, mapper: F) -> Map<Self, F>
    where
        F: FnOnce(Self::Output) -> U + Send,
        U: Send + 'static,
    {
        Map {
            inner: self,
            mapper,
        }
    }

    /// Spawn execution on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    fn start(self) -> RequestHandle<Self::Output>
    where
        Self: 'static,
    {
        RequestHandle::spawn(self.execute())
    }

    /// Execute on a private current-thread runtime, blocking the caller.
    ///
    /// Meant for synchronous callers. Inside a tokio runtime nothing is
    /// sent and `Request(Runtime)` is returned; use `execute().await` there.
    fn execute_blocking(self) -> AuthResult<Self::Output> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(RequestError::Runtime {
                message: "execute_blocking called inside a tokio runtime".to_string(),
            }
            .into());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RequestError::Runtime {
                message: e.to_string(),
            })?;
        runtime.block_on(self.execute())
    }
}

/// Two steps run in sequence. See [`Execute::and_then`].
pub struct AndThen<A, F> {
    first: A,
    continuation: F,
}

#[async_trait]
impl<A, F, N> Execute for AndThen<A, F>
where
    A: Execute,
    F: FnOnce(A::Output) -> N + Send,
    N: Execute,
{
    type Output = N::Output;

    async fn execute(self) -> AuthResult<N::Output> {
        debug!("Chain: first step in flight");
        let value = match self.first.execute().await {
            Ok(value) => value,
            Err(error) => {
                debug!(error = %error, "Chain: first step failed, next step not started");
                return Err(error);
            }
        };

        let next = (self.continuation)(value);
        debug!("Chain: next step in flight");
        let outcome = next.execute().await;
        if let Err(error) = &outcome {
            debug!(error = %error, "Chain: next step failed");
        }
        outcome
    }
}

/// A step whose success value is transformed. See [`Execute::map`].
pub struct Map<A, F> {
    inner: A,
    mapper: F,
}

#[async_trait]
impl<A, F, U> Execute for Map<A, F>
where
    A: Execute,
    F: FnOnce(A::Output) -> U + Send,
    U: Send + 'static,
{
    type Output = U;

    async fn execute(self) -> AuthResult<U> {
        let mapper = self.mapper;
        self.inner.execute().await.map(mapper)
    }
}

/// Handle to a started request or chain.
///
/// Awaiting it yields the single terminal outcome. Dropping it does not
/// cancel the work; use [`RequestHandle::cancel`].
#[derive(Debug)]
pub struct RequestHandle<T> {
    task: JoinHandle<AuthResult<T>>,
}

impl<T: Send + 'static> RequestHandle<T> {
    fn spawn<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = AuthResult<T>> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }
}

impl<T> RequestHandle<T> {
    /// Cancel the call in flight. Steps not yet started never start, and
    /// the handle resolves to [`RequestError::Canceled`] unless the outcome
    /// was already produced.
    pub fn cancel(&self) {
        debug!("Request canceled by caller");
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Future for RequestHandle<T> {
    type Output = AuthResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(e)) if e.is_cancelled() => Poll::Ready(Err(RequestError::Canceled.into())),
            Poll::Ready(Err(e)) => Poll::Ready(Err(RequestError::Runtime {
                message: e.to_string(),
            }
            .into())),
        }
    }
}
