use thiserror::Error;

pub mod thread_pool;

#[derive(Debug, Error)]
pub enum ConcurrencyError {
    #[error("a worker pool needs at least one thread")]
    EmptyPool,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub trait Execute {
    fn execute<F>(&self, f: F) where F: FnOnce() + Send + 'static;
}

/// Runs every task on the calling thread before `execute` returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inline;

impl Execute for Inline {
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        f();
    }
}
