use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;

use crate::error::Error;

/// The unit of work a pool executes. One runner instance is shared by every
/// worker, so implementations must not keep per-task mutable state.
#[async_trait]
pub trait TaskRunner: Send + Sync + 'static {
    type Task: Send + 'static;
    type Output: Send + 'static;

    async fn run(&self, task: Self::Task) -> Result<Self::Output, Error>;
}

/// Resolves exactly once with the task's result, or closes without a value
/// when the pool shuts down before the task ran.
pub type TaskReceiver<O> = oneshot::Receiver<Result<O, Error>>;

struct Job<R: TaskRunner> {
    task: R::Task,
    done: oneshot::Sender<Result<R::Output, Error>>,
}

struct WorkerHandle<R: TaskRunner> {
    tx: mpsc::Sender<R::Task>,
    abort: AbortHandle,
}

struct State<R: TaskRunner> {
    workers: HashMap<usize, WorkerHandle<R>>,
    free: Vec<usize>,
    /// Result channel of the task currently running on each busy worker.
    in_flight: HashMap<usize, oneshot::Sender<Result<R::Output, Error>>>,
    queue: VecDeque<Job<R>>,
    next_id: usize,
    closed: bool,
}

struct Inner<R: TaskRunner> {
    runner: Arc<R>,
    state: Mutex<State<R>>,
}

/// Fixed-size pool of long-lived tokio workers.
///
/// Tasks are handed to a free worker immediately or queued FIFO until one
/// frees up. A worker that panics mid-task resolves its submitter's channel
/// with [`Error::WorkerCrash`] and is replaced by a fresh worker, restoring
/// the pool to its original capacity. All bookkeeping (free list, pending
/// queue, in-flight map) lives behind a single mutex so dispatch decisions
/// are atomic with respect to workers freeing up.
pub struct WorkerPool<R: TaskRunner> {
    inner: Arc<Inner<R>>,
}

impl<R: TaskRunner> WorkerPool<R> {
    pub fn new(num_workers: usize, runner: Arc<R>) -> Self {
        let inner = Arc::new(Inner {
            runner,
            state: Mutex::new(State {
                workers: HashMap::new(),
                free: Vec::new(),
                in_flight: HashMap::new(),
                queue: VecDeque::new(),
                next_id: 0,
                closed: false,
            }),
        });

        {
            let mut state = inner.state.lock().unwrap();
            for _ in 0..num_workers.max(1) {
                let id = Inner::spawn_worker(&inner, &mut state);
                state.free.push(id);
            }
        }

        Self { inner }
    }

    /// Hand a task to a free worker, or queue it if all workers are busy.
    pub fn submit(&self, task: R::Task) -> TaskReceiver<R::Output> {
        let (done, receiver) = oneshot::channel();
        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            return receiver;
        }

        let job = Job { task, done };
        match state.free.pop() {
            Some(id) => Inner::assign(&mut state, id, job),
            None => state.queue.push_back(job),
        }
        receiver
    }

    /// Submit and await in one step.
    pub async fn run_task(&self, task: R::Task) -> Result<R::Output, Error> {
        self.submit(task).await.unwrap_or(Err(Error::PoolClosed))
    }

    /// Terminate every worker. Queued tasks are abandoned; their receivers
    /// close without ever resolving to a value.
    pub fn close(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            return;
        }
        state.closed = true;
        log::debug!("Terminating {} workers...", state.workers.len());
        for (_, worker) in state.workers.drain() {
            worker.abort.abort();
        }
        state.free.clear();
        state.queue.clear();
        state.in_flight.clear();
    }

    /// Current number of live workers. Stays at the constructed size even
    /// across crashes, since crashed workers get replaced.
    pub fn worker_count(&self) -> usize {
        self.inner.state.lock().unwrap().workers.len()
    }
}

impl<R: TaskRunner> Drop for WorkerPool<R> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<R: TaskRunner> Inner<R> {
    /// Spawn a worker loop plus a monitor that watches it for panics. The new
    /// worker is registered but not yet in the free list; callers decide
    /// whether it starts free or takes queued work right away.
    fn spawn_worker(inner: &Arc<Self>, state: &mut State<R>) -> usize {
        let id = state.next_id;
        state.next_id += 1;

        let (tx, mut rx) = mpsc::channel::<R::Task>(1);
        let runner = Arc::clone(&inner.runner);
        let pool = Arc::clone(inner);
        let handle = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                let result = runner.run(task).await;
                pool.complete(id, result);
            }
        });

        let abort = handle.abort_handle();
        let monitor = Arc::clone(inner);
        tokio::spawn(async move {
            match handle.await {
                Ok(()) => {}
                Err(err) if err.is_panic() => Inner::handle_crash(&monitor, id),
                // Cancelled on close, nothing to clean up.
                Err(_) => {}
            }
        });

        state.workers.insert(id, WorkerHandle { tx, abort });
        id
    }

    /// Called by a worker after finishing a task.
    fn complete(&self, id: usize, result: Result<R::Output, Error>) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        if let Some(done) = state.in_flight.remove(&id) {
            // The submitter may have dropped its receiver; that's fine.
            let _ = done.send(result);
        }
        Self::worker_freed(&mut state, id);
    }

    /// A worker became available: drain one queued task or mark it free.
    fn worker_freed(state: &mut State<R>, id: usize) {
        if let Some(job) = state.queue.pop_front() {
            Self::assign(state, id, job);
        } else {
            state.free.push(id);
        }
    }

    fn assign(state: &mut State<R>, id: usize, job: Job<R>) {
        let Some(worker) = state.workers.get(&id) else {
            state.queue.push_front(job);
            return;
        };
        // Capacity-1 channel of an idle worker, so this cannot be full.
        match worker.tx.try_send(job.task) {
            Ok(()) => {
                state.in_flight.insert(id, job.done);
            }
            Err(err) => {
                log::error!("Failed to hand task to worker #{}: {}", id, err);
            }
        }
    }

    /// A worker panicked. Fail its in-flight task (if any), discard it and
    /// register a replacement so pool capacity is unchanged.
    fn handle_crash(inner: &Arc<Self>, id: usize) {
        let mut state = inner.state.lock().unwrap();
        if state.closed {
            return;
        }
        log::error!("Worker #{} crashed, replacing it", id);

        if let Some(done) = state.in_flight.remove(&id) {
            let _ = done.send(Err(Error::WorkerCrash(id)));
        } else {
            // Panics only originate inside `runner.run`, which always has an
            // in-flight entry, so this branch is unreachable in practice. If a
            // worker dies between tasks anyway, drop it from the free list so
            // nothing is assigned to it.
            state.free.retain(|&free_id| free_id != id);
        }

        state.workers.remove(&id);
        let replacement = Self::spawn_worker(inner, &mut state);
        Self::worker_freed(&mut state, replacement);
    }
}
