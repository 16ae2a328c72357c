//! Completion fences and the gate that protects the shared pose buffer.
//!
//! The renderer reads the pose buffer asynchronously while it executes the
//! previous frame's commands. The buffer is not double-buffered, so the
//! producer must wait for that frame's fence before writing the next pose:
//!
//! ```text
//! mutate(N) -> record(N) -> fence(N) -> wait(fence N) -> mutate(N + 1)
//! ```
//!
//! The [`parking_lot::RwLock`] around the buffer keeps access memory-safe.
//! The fence keeps the frame ordering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::Mat4;
use parking_lot::{Condvar, Mutex, RwLock};

use crate::pose::{Pose, PoseBuffer, Skeleton};

/// Skinning matrices shared with the renderer.
pub type SharedPoseBuffer = Arc<RwLock<PoseBuffer>>;
/// Model matrix shared with the renderer.
pub type SharedTransform = Arc<RwLock<Mat4>>;

/// How a fence resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceStatus {
    /// The consumer finished the work.
    Signaled,
    /// The consumer abandoned the work and will not touch its inputs again.
    Cancelled,
}

/// Handle on asynchronous work that the producer must not overtake.
pub trait CompletionFence {
    /// Blocks until the work completes or is cancelled.
    fn wait(&self) -> FenceStatus;

    /// Reports the outcome without blocking; `None` while still pending.
    fn poll(&self) -> Option<FenceStatus>;
}

#[derive(Debug)]
struct FenceInner {
    id: u64,
    state: Mutex<Option<FenceStatus>>,
    resolved: Condvar,
}

/// Cloneable one-shot fence. The consumer resolves it with
/// [`Fence::signal`] or [`Fence::cancel`]; the producer waits on it.
#[derive(Debug, Clone)]
pub struct Fence {
    inner: Arc<FenceInner>,
}

static NEXT_FENCE_ID: AtomicU64 = AtomicU64::new(1);

impl Default for Fence {
    fn default() -> Self {
        Self::new()
    }
}

impl Fence {
    /// A pending fence with a process-unique id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FenceInner {
                id: NEXT_FENCE_ID.fetch_add(1, Ordering::Relaxed),
                state: Mutex::new(None),
                resolved: Condvar::new(),
            }),
        }
    }

    #[must_use]
    /// Process-unique id, for logs.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Marks the work complete and wakes every waiter.
    pub fn signal(&self) {
        self.resolve(FenceStatus::Signaled);
    }

    /// Marks the work abandoned and wakes every waiter.
    pub fn cancel(&self) {
        self.resolve(FenceStatus::Cancelled);
    }

    /// Like [`CompletionFence::wait`] but gives up after `timeout`,
    /// returning `None` if the fence is still pending.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> Option<FenceStatus> {
        let mut state = self.inner.state.lock();
        let _timed_out = self
            .inner
            .resolved
            .wait_while_for(&mut state, |status| status.is_none(), timeout);
        *state
    }

    /// The first resolution wins; later calls are ignored.
    fn resolve(&self, status: FenceStatus) {
        let mut state = self.inner.state.lock();
        if state.is_none() {
            *state = Some(status);
            self.inner.resolved.notify_all();
        }
    }
}

impl CompletionFence for Fence {
    fn wait(&self) -> FenceStatus {
        let mut state = self.inner.state.lock();
        // Condvar wake-ups may be spurious.
        loop {
            if let Some(status) = *state {
                return status;
            }
            self.inner.resolved.wait(&mut state);
        }
    }

    fn poll(&self) -> Option<FenceStatus> {
        *self.inner.state.lock()
    }
}

/// Guards the shared pose buffer: every write first waits on the fence of
/// the frame the renderer may still be reading.
#[derive(Debug, Clone)]
pub struct PoseCommitGate {
    buffer: SharedPoseBuffer,
}

impl PoseCommitGate {
    /// Gate over a fresh buffer of `bone_count` identity matrices.
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(PoseBuffer::new(bone_count))),
        }
    }

    /// Handle the renderer reads from.
    #[must_use]
    pub fn buffer(&self) -> SharedPoseBuffer {
        Arc::clone(&self.buffer)
    }

    /// Waits on `fence` if one is outstanding, then recomputes the skinning
    /// matrices from `pose`.
    ///
    /// The wait is unconditional: a stalled consumer stalls the caller.
    pub fn commit(&self, fence: Option<&dyn CompletionFence>, skeleton: &Skeleton, pose: &Pose) {
        if let Some(previous) = fence {
            match previous.wait() {
                FenceStatus::Signaled => {}
                FenceStatus::Cancelled => {
                    log::warn!("previous frame's fence was cancelled; committing pose anyway");
                }
            }
        }
        let mut buffer = self.buffer.write();
        buffer.update_from(skeleton, pose);
        log::trace!("pose generation {} committed", buffer.generation());
    }
}
