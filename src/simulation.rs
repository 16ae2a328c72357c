//! The per-frame loop for one actor.
//!
//! [`Simulation`] owns the actor and its collaborators and runs the phases in
//! a fixed order:
//!
//! ```text
//! steer -> integrate -> ground -> classify -> animate (fence wait, commit)
//!       -> compose transform -> record draw -> submit (new fence)
//! ```
//!
//! The fence returned by each submit is held until the next frame's pose
//! commit, so at most one frame of pose data is ever in flight.

use crate::actor::{compose_transform, destroy_actor, Actor};
use crate::animation::set_animation;
use crate::classifier::StateClassifier;
use crate::control::SteeringController;
use crate::fence::{CompletionFence, FenceStatus};
use crate::input::ActorInput;
use crate::locomotion::LocomotionState;
use crate::physics::{integrate, resolve_grounding};
use crate::render::RenderBackend;

/// What one call to [`Simulation::step`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based index of the frame.
    pub frame: u64,
    /// Locomotion state the classifier settled on.
    pub state: LocomotionState,
    /// Cached horizontal speed after integration.
    pub horizontal_speed: f32,
    /// Blend ratio the animation handler used.
    pub blend_ratio: f32,
    /// Whether the actor ended the frame on the ground.
    pub grounded: bool,
    /// Pose buffer generation after this frame's commit.
    pub pose_generation: u64,
}

/// Drives one actor through steering, physics, classification, animation
/// and rendering.
pub struct Simulation<S, C, R: RenderBackend> {
    actor: Actor,
    steering: S,
    classifier: C,
    renderer: R,
    pending: Option<R::Fence>,
    frame: u64,
}

impl<S, C, R> Simulation<S, C, R>
where
    S: SteeringController,
    C: StateClassifier,
    R: RenderBackend,
{
    /// Takes ownership of `actor` and its collaborators; no frame has run
    /// and no fence is outstanding.
    #[must_use]
    pub const fn new(actor: Actor, steering: S, classifier: C, renderer: R) -> Self {
        Self {
            actor,
            steering,
            classifier,
            renderer,
            pending: None,
            frame: 0,
        }
    }

    /// The simulated actor.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The render back end draws are recorded into.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    /// Fence of the most recently submitted frame, if any.
    #[must_use]
    pub const fn pending_fence(&self) -> Option<&R::Fence> {
        self.pending.as_ref()
    }

    /// Runs one frame with `input` as the actor's input snapshot.
    ///
    /// Blocks in the pose commit until the renderer has finished the
    /// previous frame.
    pub fn step(&mut self, input: ActorInput, frame_time: f32) -> FrameReport {
        let actor = &mut self.actor;
        actor.input = input;

        self.steering.steer(actor, frame_time);
        integrate(actor, frame_time);
        resolve_grounding(actor);

        let next = self.classifier.classify(actor);
        actor.set_state(next);

        let previous_frame = self.pending.take();
        set_animation(
            actor,
            frame_time,
            previous_frame.as_ref().map(|fence| fence as &dyn CompletionFence),
        );
        compose_transform(actor);

        self.renderer.record_draw(actor.id, &actor.render);
        self.pending = Some(self.renderer.submit_frame());

        let report = FrameReport {
            frame: self.frame,
            state: actor.state,
            horizontal_speed: actor.horizontal_speed,
            blend_ratio: actor.animation.blend_ratio,
            grounded: actor.grounded,
            pose_generation: actor.render.pose_buffer().read().generation(),
        };
        self.frame += 1;
        log::trace!("{report:?}");
        report
    }

    /// Waits for the last submitted frame, destroys the actor and hands the
    /// renderer back.
    pub fn shutdown(self) -> R {
        let Self {
            actor,
            renderer,
            pending,
            frame,
            ..
        } = self;
        if let Some(fence) = pending {
            if fence.wait() == FenceStatus::Cancelled {
                log::warn!("final frame of actor {} was cancelled", actor.id);
            }
        }
        log::info!("simulation of actor {} stopped after {frame} frames", actor.id);
        destroy_actor(actor);
        renderer
    }
}
