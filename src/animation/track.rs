//! Clip playback and the pose tracks clips write into.

use std::sync::Arc;

use crate::assets::{AnimationClip, AssetError, Model};
use crate::constants::{
    CLIP_FALL, CLIP_IDLE, CLIP_JOG, CLIP_JUMP, CLIP_LAND, CLIP_ROLL, CLIP_RUN, CLIP_SPRINT,
    CLIP_TRANSITION, CLIP_WALK,
};
use crate::pose::Pose;

/// Names a clip within an [`AnimationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipSlot {
    /// Breathing loop played while standing.
    Idle,
    /// Short step between idle and walking.
    Transition,
    /// Walking loop.
    Walk,
    /// Slow run blended in while walking speeds up.
    Jog,
    /// Running loop.
    Run,
    /// Sprinting loop.
    Sprint,
    /// Not played yet.
    Roll,
    /// Not played yet.
    Jump,
    /// Not played yet.
    Fall,
    /// Not played yet.
    Land,
}

/// Playback cursor over one shared clip.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    clip: Arc<AnimationClip>,
    time: f32,
    speed: f32,
    looping: bool,
}

impl ClipPlayer {
    /// Looping player at time zero and normal speed.
    #[must_use]
    pub const fn looping(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            speed: 1.0,
            looping: true,
        }
    }

    /// Playback rate multiplier; `0` freezes the clip.
    pub const fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Advances by `dt` scaled by the playback speed and samples into `pose`.
    pub fn update(&mut self, dt: f32, pose: &mut Pose) {
        let duration = self.clip.duration();
        let advanced = self.time + dt * self.speed;
        self.time = if self.looping {
            advanced.rem_euclid(duration)
        } else {
            advanced.clamp(0.0, duration)
        };
        self.clip.sample_into(self.time, self.looping, pose);
    }
}

/// Players for every clip an actor can show, bound to one track.
///
/// The roll, jump, fall and land clips are optional: the blend engine does
/// not play them yet, so a model without them is still usable.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    idle: ClipPlayer,
    transition: ClipPlayer,
    walk: ClipPlayer,
    jog: ClipPlayer,
    run: ClipPlayer,
    sprint: ClipPlayer,
    roll: Option<ClipPlayer>,
    jump: Option<ClipPlayer>,
    fall: Option<ClipPlayer>,
    land: Option<ClipPlayer>,
}

impl AnimationSet {
    /// Binds the set's clips from `model`.
    ///
    /// # Errors
    /// Returns [`AssetError::MissingClip`] if any grounded locomotion clip is
    /// absent.
    pub fn bind(model: &Model) -> Result<Self, AssetError> {
        let required = |name: &str| model.require_clip(name).map(ClipPlayer::looping);
        let optional = |name: &str| model.clip(name).map(ClipPlayer::looping);
        Ok(Self {
            idle: required(CLIP_IDLE)?,
            transition: required(CLIP_TRANSITION)?,
            walk: required(CLIP_WALK)?,
            jog: required(CLIP_JOG)?,
            run: required(CLIP_RUN)?,
            sprint: required(CLIP_SPRINT)?,
            roll: optional(CLIP_ROLL),
            jump: optional(CLIP_JUMP),
            fall: optional(CLIP_FALL),
            land: optional(CLIP_LAND),
        })
    }

    /// Mutable player for `slot`, if that clip is bound.
    pub const fn player_mut(&mut self, slot: ClipSlot) -> Option<&mut ClipPlayer> {
        match slot {
            ClipSlot::Idle => Some(&mut self.idle),
            ClipSlot::Transition => Some(&mut self.transition),
            ClipSlot::Walk => Some(&mut self.walk),
            ClipSlot::Jog => Some(&mut self.jog),
            ClipSlot::Run => Some(&mut self.run),
            ClipSlot::Sprint => Some(&mut self.sprint),
            ClipSlot::Roll => self.roll.as_mut(),
            ClipSlot::Jump => self.jump.as_mut(),
            ClipSlot::Fall => self.fall.as_mut(),
            ClipSlot::Land => self.land.as_mut(),
        }
    }
}

/// A clip set and the local pose its clips write into.
///
/// Each actor owns two: "main", whose pose is committed, and "blend", used
/// only as a cross-fade source.
#[derive(Debug, Clone)]
pub struct PoseTrack {
    clips: AnimationSet,
    pose: Pose,
}

impl PoseTrack {
    /// Track in the model's bind pose with every clip at time zero.
    ///
    /// # Errors
    /// Propagates [`AnimationSet::bind`] failures.
    pub fn bind(model: &Model) -> Result<Self, AssetError> {
        Ok(Self {
            clips: AnimationSet::bind(model)?,
            pose: model.skeleton().bind_pose(),
        })
    }

    /// Local pose the track's clips last wrote.
    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Advances the clip in `slot` and writes it over this track's pose.
    ///
    /// Unbound slots are skipped.
    pub fn advance(&mut self, slot: ClipSlot, dt: f32) {
        if let Some(player) = self.clips.player_mut(slot) {
            player.update(dt, &mut self.pose);
        } else {
            log::trace!("clip slot {slot:?} unbound; track left as is");
        }
    }

    /// Sets the playback speed of the clip in `slot`.
    pub fn set_speed(&mut self, slot: ClipSlot, speed: f32) {
        if let Some(player) = self.clips.player_mut(slot) {
            player.set_speed(speed);
        }
    }

    /// Mixes `source`'s pose into this track: `0` keeps this pose, `1`
    /// replaces it with `source`'s.
    pub fn blend_from(&mut self, source: &Self, weight: f32) {
        self.pose.blend_toward(&source.pose, weight);
    }
}
