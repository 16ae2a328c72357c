//! The actor aggregate and its lifecycle.
//!
//! An [`Actor`] is created once per controllable entity, mutated every frame
//! by the integrator and the blend engine, and consumed by
//! [`destroy_actor`], which releases its render resources exactly once.
use std::fmt;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};
use parking_lot::RwLock;

use crate::animation::ActorAnimationContext;
use crate::assets::{AssetError, Model};
use crate::config::ActorSettings;
use crate::fence::{CompletionFence, PoseCommitGate, SharedPoseBuffer, SharedTransform};
use crate::input::ActorInput;
use crate::locomotion::LocomotionState;
use crate::physics::RigidBody;
use crate::pose::Pose;
use crate::vector_math::rad;

/// Identifier of one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Buffers an actor shares with the renderer, plus the model they derive
/// from. Owned by exactly one actor.
#[derive(Debug)]
pub struct RenderResources {
    model: Arc<Model>,
    transform: SharedTransform,
    pose: PoseCommitGate,
}

impl RenderResources {
    fn new(model: Arc<Model>) -> Self {
        let bone_count = model.skeleton().len();
        Self {
            model,
            transform: Arc::new(RwLock::new(Mat4::IDENTITY)),
            pose: PoseCommitGate::new(bone_count),
        }
    }

    /// Model the actor was created from.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Model matrix handle for recorded draws.
    #[must_use]
    pub fn transform(&self) -> SharedTransform {
        Arc::clone(&self.transform)
    }

    /// Skinning matrix handle for recorded draws.
    #[must_use]
    pub fn pose_buffer(&self) -> SharedPoseBuffer {
        self.pose.buffer()
    }

    pub(crate) fn commit_pose(&self, pose: &Pose, fence: Option<&dyn CompletionFence>) {
        self.pose.commit(fence, self.model.skeleton(), pose);
    }
}

/// One controllable entity.
#[derive(Debug)]
pub struct Actor {
    /// Identifier used in logs and draws.
    pub id: ActorId,
    /// Buffers shared with the renderer.
    pub render: RenderResources,
    /// Per-axis model scale.
    pub scale: Vec3,
    /// Physical state advanced by the integrator.
    pub body: RigidBody,
    /// Camera-relative heading requested by steering, in degrees.
    pub target_yaw: f32,
    /// Planar velocity the last steering request aimed for.
    pub target_velocity: Vec3,
    /// Cached length of the horizontal velocity, refreshed while moving.
    pub horizontal_speed: f32,
    /// Whether the body rests on the ground this frame.
    pub grounded: bool,
    /// Height of the ground under the actor.
    pub grounding_height: f32,
    /// State before the last change of `state`.
    pub previous_state: LocomotionState,
    /// Locomotion state chosen by the classifier.
    pub state: LocomotionState,
    /// Tuning fixed at creation.
    pub settings: ActorSettings,
    /// Controller snapshot for the current frame.
    pub input: ActorInput,
    /// Blend state carried between frames.
    pub animation: ActorAnimationContext,
}

impl Actor {
    /// Stores the classifier's verdict, remembering the old state when it
    /// changes.
    pub fn set_state(&mut self, next: LocomotionState) {
        if next == self.state {
            return;
        }
        log::debug!("actor {} state {:?} -> {next:?}", self.id, self.state);
        self.previous_state = self.state;
        self.state = next;
    }
}

/// Creates an actor standing idle at the origin with default tuning.
///
/// # Errors
/// Returns [`AssetError::MissingClip`] if `model` lacks a locomotion clip.
pub fn create_actor(id: ActorId, model: Arc<Model>) -> Result<Actor, AssetError> {
    create_actor_with_settings(id, model, ActorSettings::default())
}

/// Creates an actor with explicit tuning.
///
/// # Errors
/// Returns [`AssetError::MissingClip`] if `model` lacks a locomotion clip.
pub fn create_actor_with_settings(
    id: ActorId,
    model: Arc<Model>,
    settings: ActorSettings,
) -> Result<Actor, AssetError> {
    let animation = ActorAnimationContext::bind(&model)?;
    log::info!(
        "Creating actor {id} with {} bones",
        model.skeleton().len()
    );
    Ok(Actor {
        id,
        render: RenderResources::new(model),
        scale: Vec3::ONE,
        body: RigidBody::default(),
        target_yaw: 0.0,
        target_velocity: Vec3::ZERO,
        horizontal_speed: 0.0,
        grounded: true,
        grounding_height: 0.0,
        previous_state: LocomotionState::Empty,
        state: LocomotionState::StandIdle,
        settings,
        input: ActorInput::default(),
        animation,
    })
}

/// Builds the actor's model matrix from scale, rotation (degrees) and
/// position, and publishes it to the shared transform slot.
pub fn compose_transform(actor: &Actor) -> Mat4 {
    let rotation = actor.body.rotation;
    let matrix = Mat4::from_scale_rotation_translation(
        actor.scale,
        Quat::from_euler(EulerRot::ZYX, rad(rotation.z), rad(rotation.y), rad(rotation.x)),
        actor.body.position,
    );
    *actor.render.transform.write() = matrix;
    matrix
}

/// Tears the actor down, releasing its render resources.
///
/// Taking the actor by value makes a second release impossible. Callers must
/// have waited on the last fence issued for it.
pub fn destroy_actor(actor: Actor) {
    log::info!("Destroying actor {}", actor.id);
    drop(actor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::procedural_model;
    use rstest::{fixture, rstest};

    #[fixture]
    fn actor() -> Actor {
        let model = Arc::new(procedural_model(3).expect("procedural model"));
        create_actor(ActorId(7), model).expect("actor")
    }

    #[rstest]
    fn new_actor_stands_idle_at_rest(actor: Actor) {
        assert_eq!(actor.state, LocomotionState::StandIdle);
        assert_eq!(actor.animation.current, LocomotionState::Empty);
        assert_eq!(actor.body, RigidBody::default());
        assert!(actor.grounded);
    }

    #[rstest]
    fn set_state_tracks_previous(mut actor: Actor) {
        actor.set_state(LocomotionState::Walking);
        actor.set_state(LocomotionState::Walking);
        assert_eq!(actor.previous_state, LocomotionState::StandIdle);
        assert_eq!(actor.state, LocomotionState::Walking);
    }

    #[rstest]
    fn transform_is_published(mut actor: Actor) {
        actor.body.position = Vec3::new(1.0, 2.0, 3.0);
        actor.body.rotation.z = 90.0;
        let matrix = compose_transform(&actor);
        assert_eq!(*actor.render.transform().read(), matrix);
        let forward = matrix.transform_vector3(Vec3::X);
        assert!(forward.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(matrix.w_axis.truncate().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }

    #[rstest]
    fn destroy_releases_shared_buffers(actor: Actor) {
        let pose = actor.render.pose_buffer();
        assert_eq!(Arc::strong_count(&pose), 2);
        destroy_actor(actor);
        assert_eq!(Arc::strong_count(&pose), 1);
    }
}
