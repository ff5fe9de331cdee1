//! Worker Pool
//!
//! Fixed set of threads running connection jobs from a shared queue.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{Result, TreeKvError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of worker threads
pub struct WorkerPool {
    /// Job queue; dropped to tell workers to drain and exit
    sender: Option<Sender<Job>>,

    /// One handle per worker thread
    workers: Vec<JoinHandle<()>>,

    /// Each worker sends one message here when it exits
    finished: Receiver<()>,
}

impl WorkerPool {
    /// Spawn `size` named worker threads
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(TreeKvError::Config(
                "worker pool needs at least one thread".to_string(),
            ));
        }

        let (sender, jobs) = channel::unbounded::<Job>();
        let (done, finished) = channel::bounded::<()>(size);

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let jobs = jobs.clone();
            let done = done.clone();
            let handle = thread::Builder::new()
                .name(format!("treekv-worker-{}", id))
                .spawn(move || {
                    for job in jobs.iter() {
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::error!("Worker {} recovered from a panicking job", id);
                        }
                    }
                    let _ = done.send(());
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
            finished,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for the next free worker
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| TreeKvError::Network("worker pool is shut down".to_string()))?;
        sender
            .send(Box::new(job))
            .map_err(|_| TreeKvError::Network("worker pool is shut down".to_string()))
    }

    /// Stop taking jobs and wait up to `grace` for queued and running jobs.
    ///
    /// Returns how many workers were still busy when the grace period ran
    /// out. Those threads are detached, not joined.
    pub fn shutdown(mut self, grace: Duration) -> usize {
        self.sender.take();

        let deadline = Instant::now() + grace;
        let total = self.workers.len();
        let mut exited = 0;
        while exited < total {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.finished.recv_timeout(remaining) {
                Ok(()) => exited += 1,
                Err(_) => break,
            }
        }

        // Workers that signalled are past their last job, so joining is brief
        for handle in self.workers.drain(..) {
            if exited == total || handle.is_finished() {
                let _ = handle.join();
            }
        }
        total - exited
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets idle workers exit; nobody waits for them here
        self.sender.take();
    }
}
