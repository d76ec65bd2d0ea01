//! In-process job queues with worker pools, retry budgets, and exponential
//! backoff.
//!
//! Each queue owns an unbounded channel and a fixed pool of worker tasks;
//! the pool size is the queue's concurrency cap. Delayed delivery and retry
//! re-enqueues are timer tasks that feed the same channel, so ordering
//! between stages is best-effort only and correctness rests on each
//! handler's precondition checks.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

use super::pipeline::PipelineError;

/// Tuning for one named queue: retry budget, backoff base, worker pool size.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub name: &'static str,
    pub attempts: u32,
    pub backoff_base: Duration,
    pub concurrency: usize,
}

pub type JobFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PipelineError>> + Send + 'a>>;

/// Executes one job payload; errors feed the queue's retry machinery.
pub trait JobHandler<P>: Send + Sync + 'static {
    fn run(&self, payload: P) -> JobFuture<'_>;
}

struct QueuedJob<P> {
    payload: P,
    attempt: u32,
}

/// Cloneable enqueue handle for one queue.
pub struct JobQueue<P> {
    config: QueueConfig,
    tx: mpsc::UnboundedSender<QueuedJob<P>>,
}

impl<P> Clone for JobQueue<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            tx: self.tx.clone(),
        }
    }
}

/// Owns the receiving side until `start` spawns the worker pool.
pub struct JobRunner<P> {
    config: QueueConfig,
    tx: mpsc::UnboundedSender<QueuedJob<P>>,
    rx: mpsc::UnboundedReceiver<QueuedJob<P>>,
}

impl<P: Clone + Send + 'static> JobQueue<P> {
    /// Builds the queue handle and its not-yet-started runner.
    pub fn channel(config: QueueConfig) -> (Self, JobRunner<P>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Self {
            config,
            tx: tx.clone(),
        };
        let runner = JobRunner { config, tx, rx };
        (queue, runner)
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn enqueue(&self, payload: P) {
        self.dispatch(QueuedJob {
            payload,
            attempt: 1,
        });
    }

    /// Enqueues after `delay`; a zero delay is delivered immediately.
    pub fn enqueue_after(&self, payload: P, delay: Duration) {
        if delay.is_zero() {
            self.enqueue(payload);
            return;
        }

        let tx = self.tx.clone();
        let name = self.config.name;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx
                .send(QueuedJob {
                    payload,
                    attempt: 1,
                })
                .is_err()
            {
                warn!(queue = name, "queue closed before delayed job became due");
            }
        });
    }

    fn dispatch(&self, job: QueuedJob<P>) {
        if self.tx.send(job).is_err() {
            warn!(queue = self.config.name, "queue closed; job dropped");
        }
    }
}

impl<P: Clone + Send + 'static> JobRunner<P> {
    /// Spawns the worker pool; each worker pulls from the shared channel so
    /// at most `concurrency` jobs run at once.
    pub fn start(self, handler: Arc<dyn JobHandler<P>>) {
        let rx = Arc::new(Mutex::new(self.rx));
        for worker in 0..self.config.concurrency.max(1) {
            tokio::spawn(worker_loop(
                self.config,
                self.tx.clone(),
                Arc::clone(&rx),
                Arc::clone(&handler),
                worker,
            ));
        }
    }
}

async fn worker_loop<P: Clone + Send + 'static>(
    config: QueueConfig,
    tx: mpsc::UnboundedSender<QueuedJob<P>>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<QueuedJob<P>>>>,
    handler: Arc<dyn JobHandler<P>>,
    worker: usize,
) {
    loop {
        let job = { rx.lock().await.recv().await };
        let Some(job) = job else { break };

        match handler.run(job.payload.clone()).await {
            Ok(()) => {}
            Err(err) if job.attempt < config.attempts => {
                let delay = config.backoff_base * 2u32.pow(job.attempt - 1);
                if err.is_expected() {
                    // Precondition misses are the normal recovery path for
                    // the staggered pipeline, not incidents.
                    info!(
                        queue = config.name,
                        worker,
                        attempt = job.attempt,
                        delay_ms = delay.as_millis() as u64,
                        %err,
                        "job waiting on an earlier stage; retrying"
                    );
                } else {
                    warn!(
                        queue = config.name,
                        worker,
                        attempt = job.attempt,
                        delay_ms = delay.as_millis() as u64,
                        %err,
                        "job attempt failed; retrying"
                    );
                }

                let tx = tx.clone();
                let payload = job.payload;
                let attempt = job.attempt + 1;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(QueuedJob { payload, attempt });
                });
            }
            Err(err) => {
                error!(
                    queue = config.name,
                    worker,
                    attempts = job.attempt,
                    %err,
                    "job exhausted its retry budget"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingHandler {
        calls: Arc<AtomicU32>,
        fail_first: u32,
    }

    impl JobHandler<u32> for CountingHandler {
        fn run(&self, _payload: u32) -> JobFuture<'_> {
            Box::pin(async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call <= self.fail_first {
                    Err(PipelineError::Rendering(
                        crate::assessment::report::RenderError::Engine("boom".to_string()),
                    ))
                } else {
                    Ok(())
                }
            })
        }
    }

    fn config(attempts: u32) -> QueueConfig {
        QueueConfig {
            name: "test-queue",
            attempts,
            backoff_base: Duration::from_millis(5),
            concurrency: 2,
        }
    }

    #[tokio::test]
    async fn jobs_are_retried_until_they_succeed() {
        let calls = Arc::new(AtomicU32::new(0));
        let (queue, runner) = JobQueue::channel(config(3));
        runner.start(Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
            fail_first: 2,
        }));

        queue.enqueue(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_budget_is_respected() {
        let calls = Arc::new(AtomicU32::new(0));
        let (queue, runner) = JobQueue::channel(config(2));
        runner.start(Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
            fail_first: u32::MAX,
        }));

        queue.enqueue(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delayed_jobs_arrive_after_the_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let (queue, runner) = JobQueue::channel(config(1));
        runner.start(Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
            fail_first: 0,
        }));

        queue.enqueue_after(1, Duration::from_millis(40));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_delay_means_immediate_delivery() {
        let calls = Arc::new(AtomicU32::new(0));
        let (queue, runner) = JobQueue::channel(config(1));
        runner.start(Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
            fail_first: 0,
        }));

        queue.enqueue_after(1, Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
