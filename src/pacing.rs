// src/pacing.rs
//! Visible processing delays for cover letter generation and review submission.
//!
//! A [`Pacer`] either sleeps inline ([`Pacer::pace`]) or runs the delayed work
//! as a spawned task that can be cancelled ([`Pacer::spawn`]).

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacingError {
    #[error("Paced task was cancelled")]
    Cancelled,
    #[error("Paced task failed: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// No delay at all
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Run `work` after the delay on the tokio runtime
    pub fn spawn<F>(&self, work: F) -> PacedTask<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let pacer = *self;
        let handle = tokio::spawn(async move {
            pacer.pace().await;
            work.await
        });
        PacedTask { handle }
    }
}

/// Handle to delayed work started by [`Pacer::spawn`]
#[derive(Debug)]
pub struct PacedTask<T> {
    handle: JoinHandle<T>,
}

impl<T> PacedTask<T> {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<T, PacingError> {
        self.await
    }
}

impl<T> Future for PacedTask<T> {
    type Output = Result<T, PacingError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|result| {
            result.map_err(|e| {
                if e.is_cancelled() {
                    PacingError::Cancelled
                } else {
                    PacingError::Panicked(e.to_string())
                }
            })
        })
    }
}
