use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::trace;

use crate::concurrency::{ConcurrencyError, Execute};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, tasks: Receiver<Task>) -> Result<Self, ConcurrencyError> {
        let handle = thread::Builder::new()
            .name(format!("tick-worker-{}", id))
            // the loop ends once the pool drops its sender
            .spawn(move || {
                for task in tasks.iter() {
                    task();
                }
            })?;
        Ok(Self { id, handle: Some(handle) })
    }
}

/// Fixed set of worker threads pulling tasks off one shared queue.
pub struct ThreadPool {
    workers: Vec<Worker>,
    task_sender: Option<Sender<Task>>,
}

impl ThreadPool {
    pub fn new(size: usize) -> Result<Self, ConcurrencyError> {
        if size == 0 {
            return Err(ConcurrencyError::EmptyPool);
        }

        let (task_sender, task_receiver) = unbounded();
        let workers = (0..size)
            .map(|id| Worker::spawn(id, task_receiver.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            workers,
            task_sender: Some(task_sender),
        })
    }
}

impl Execute for ThreadPool {
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // the sender only goes away in drop, and workers outlive it
        if let Some(sender) = &self.task_sender {
            if sender.send(Box::new(f)).is_err() {
                trace!("task dropped, no worker left to run it");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.task_sender.take();
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    trace!(worker = worker.id, "worker panicked");
                }
            }
        }
    }
}
