//! Locomotion-driven animation blending.
//!
//! [`set_animation`] runs once per frame. It picks the handler for the
//! actor's locomotion state, advances clips on the main and blend
//! [`PoseTrack`]s, mixes them by the [`blend_ratio`], and finally commits the
//! main pose through the actor's [`PoseCommitGate`](crate::fence::PoseCommitGate).
//!
//! A handler latches its state on exit: previous becomes current and current
//! becomes the handler's state, unless it already was. The frame on which the
//! state changes therefore still blends on the outgoing state's condition,
//! which avoids a visible pop at the transition.

mod blend;
mod track;

pub use blend::{blend_ratio, is_animated};
pub use track::{AnimationSet, ClipPlayer, ClipSlot, PoseTrack};

use crate::actor::Actor;
use crate::assets::{AssetError, Model};
use crate::config::ActorSettings;
use crate::fence::CompletionFence;
use crate::locomotion::LocomotionState;

/// Animation state carried by one actor between frames.
#[derive(Debug, Clone)]
pub struct ActorAnimationContext {
    /// State whose handler ran last.
    pub current: LocomotionState,
    /// State `current` replaced when it last changed.
    pub previous: LocomotionState,
    /// Track whose pose is committed to the renderer.
    pub main: PoseTrack,
    /// Cross-fade source mixed into `main`.
    pub blend: PoseTrack,
    /// Weight of `blend` in `main`, always within `[0, 1]`.
    pub blend_ratio: f32,
    /// Reserved; no handler reads or writes it.
    pub change_counter: u8,
    /// Reserved; no handler reads or writes it.
    pub synced: bool,
}

impl ActorAnimationContext {
    /// Binds both tracks to `model`'s clips with both states empty.
    ///
    /// # Errors
    /// Returns [`AssetError::MissingClip`] when a locomotion clip is absent.
    pub fn bind(model: &Model) -> Result<Self, AssetError> {
        Ok(Self {
            current: LocomotionState::Empty,
            previous: LocomotionState::Empty,
            main: PoseTrack::bind(model)?,
            blend: PoseTrack::bind(model)?,
            blend_ratio: 0.0,
            change_counter: 0,
            synced: false,
        })
    }

    /// Runs the handler for `state`.
    ///
    /// Roll, jump and falling have no animation yet and pass through: the
    /// context and both poses are left exactly as they were.
    ///
    /// # Panics
    /// Panics on [`LocomotionState::Empty`]; an active actor is never in
    /// that state, so reaching it is a bug in the caller.
    pub fn apply_state(
        &mut self,
        state: LocomotionState,
        horizontal_speed: f32,
        settings: &ActorSettings,
        frame_time: f32,
    ) {
        match state {
            LocomotionState::Empty => {
                panic!("animation requested for an actor in the empty locomotion state")
            }
            _ if is_animated(state) => {
                let handled =
                    blend::run_grounded(self, state, horizontal_speed, settings, frame_time);
                debug_assert!(handled, "animated state {state:?} has no blend table");
            }
            _ => log::trace!("{state:?} has no animation; pose held"),
        }
    }

    /// Records `target` as the current state. Re-entering the current state
    /// changes nothing.
    fn latch(&mut self, target: LocomotionState) {
        if self.current == target {
            return;
        }
        log::debug!("animation state {:?} -> {target:?}", self.current);
        self.previous = self.current;
        self.current = target;
    }
}

/// Animates `actor` for one frame and commits its pose.
///
/// When `fence` is given the commit first waits for it, so the renderer has
/// finished reading the previous frame's pose before it is overwritten.
///
/// The commit runs for every state. For states without animation the
/// skinning matrices come out bit-identical to the previous frame's; only
/// the buffer's [`generation`](crate::pose::PoseBuffer::generation) counter
/// advances.
///
/// # Panics
/// Panics if the actor's locomotion state is [`LocomotionState::Empty`].
pub fn set_animation(actor: &mut Actor, frame_time: f32, fence: Option<&dyn CompletionFence>) {
    let settings = actor.settings;
    actor
        .animation
        .apply_state(actor.state, actor.horizontal_speed, &settings, frame_time);
    actor.render.commit_pose(actor.animation.main.pose(), fence);
}
