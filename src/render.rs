//! Render back end boundary and a threaded co-processor emulator.
//!
//! The simulation records draws during a frame and then submits them with
//! [`RenderBackend::submit_frame`], getting back the fence it must wait on
//! before the next pose mutation.
//!
//! [`CoProcessor`] stands in for the asynchronous rendering hardware. A worker
//! thread receives each submitted frame over a channel, reads every draw's
//! transform and pose buffer, then signals the frame's fence.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::actor::{ActorId, RenderResources};
use crate::fence::{CompletionFence, Fence, SharedPoseBuffer, SharedTransform};

/// Consumer of recorded draws.
pub trait RenderBackend {
    /// Fence type handed back for each submitted frame.
    type Fence: CompletionFence + 'static;

    /// Records a draw of the actor owning `resources` for the current frame.
    fn record_draw(&mut self, actor: ActorId, resources: &RenderResources);

    /// Submits everything recorded since the last submit and returns the
    /// fence that resolves once the back end stops reading it.
    fn submit_frame(&mut self) -> Self::Fence;
}

/// One recorded draw: handles on the buffers the back end will read.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Actor being drawn.
    pub actor: ActorId,
    /// Model matrix slot.
    pub transform: SharedTransform,
    /// Skinning matrix buffer.
    pub pose: SharedPoseBuffer,
}

/// Counters the worker updates as it executes frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoProcessorStats {
    /// Frames executed and signalled.
    pub frames: u64,
    /// Draws read across all frames.
    pub draws: u64,
    /// Pose generation observed by the most recent draw.
    pub last_pose_generation: u64,
}

struct Submission {
    draws: Vec<DrawCall>,
    fence: Fence,
}

/// Threaded stand-in for the asynchronous render co-processor.
///
/// Dropping it drains every submitted frame and joins the worker.
pub struct CoProcessor {
    submissions: Option<Sender<Submission>>,
    worker: Option<JoinHandle<()>>,
    recorded: Vec<DrawCall>,
    stats: Arc<Mutex<CoProcessorStats>>,
}

impl CoProcessor {
    /// Starts a worker that executes frames as fast as they arrive.
    #[must_use]
    pub fn spawn() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Starts a worker that spends `latency` reading each draw, which makes
    /// ordering violations observable in tests.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Submission>();
        let stats = Arc::new(Mutex::new(CoProcessorStats::default()));
        let worker_stats = Arc::clone(&stats);
        let worker = thread::spawn(move || execute(&receiver, &worker_stats, latency));
        log::info!("co-processor started");
        Self {
            submissions: Some(sender),
            worker: Some(worker),
            recorded: Vec::new(),
            stats,
        }
    }

    /// Snapshot of the worker's counters.
    #[must_use]
    pub fn stats(&self) -> CoProcessorStats {
        *self.stats.lock()
    }
}

fn execute(receiver: &Receiver<Submission>, stats: &Mutex<CoProcessorStats>, latency: Duration) {
    for Submission { draws, fence } in receiver {
        for draw in &draws {
            let _transform = draw.transform.read();
            let pose = draw.pose.read();
            if !latency.is_zero() {
                thread::sleep(latency);
            }
            let mut counters = stats.lock();
            counters.draws += 1;
            counters.last_pose_generation = pose.generation();
        }
        stats.lock().frames += 1;
        fence.signal();
    }
    log::debug!("co-processor drained");
}

impl RenderBackend for CoProcessor {
    type Fence = Fence;

    fn record_draw(&mut self, actor: ActorId, resources: &RenderResources) {
        self.recorded.push(DrawCall {
            actor,
            transform: resources.transform(),
            pose: resources.pose_buffer(),
        });
    }

    fn submit_frame(&mut self) -> Fence {
        let fence = Fence::new();
        let submission = Submission {
            draws: std::mem::take(&mut self.recorded),
            fence: fence.clone(),
        };
        let delivered = self
            .submissions
            .as_ref()
            .is_some_and(|sender| sender.send(submission).is_ok());
        if !delivered {
            log::warn!("co-processor gone; cancelling fence {}", fence.id());
            fence.cancel();
        }
        fence
    }
}

impl Drop for CoProcessor {
    fn drop(&mut self) {
        drop(self.submissions.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("co-processor worker panicked");
            }
        }
    }
}
