//! Library crate providing the `stride` actor locomotion core.
//!
//! Physics integration, locomotion-driven animation blending and the
//! fence-gated pose commit, plus reference collaborators that let the core
//! run headless. Re-exports the common entry points for the binary and tests.
pub mod actor;
pub mod animation;
pub mod assets;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod control;
pub mod fence;
pub mod input;
pub mod locomotion;
pub mod logging;
pub mod physics;
pub mod pose;
pub mod render;
pub mod simulation;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use actor::{compose_transform, create_actor, create_actor_with_settings, destroy_actor};
pub use actor::{Actor, ActorId, RenderResources};
pub use animation::{blend_ratio, set_animation, ActorAnimationContext};
pub use assets::{procedural_model, AnimationClip, AssetError, Model};
pub use classifier::{IntentClassifier, StateClassifier};
pub use config::{ActorSettings, ConfigError};
pub use control::{InputSteering, SteeringController};
pub use fence::{CompletionFence, Fence, FenceStatus, PoseCommitGate};
pub use input::ActorInput;
pub use locomotion::LocomotionState;
pub use logging::init as init_logging;
pub use physics::{integrate, resolve_grounding, RigidBody};
pub use render::{CoProcessor, CoProcessorStats, RenderBackend};
pub use simulation::{FrameReport, Simulation};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use stride::prelude::*;
    //! ```

    pub use crate::create_actor;
    pub use crate::ActorId;
    pub use crate::ActorInput;
    pub use crate::CoProcessor;
    pub use crate::InputSteering;
    pub use crate::IntentClassifier;
    pub use crate::LocomotionState;
    pub use crate::Simulation;
    pub use glam::{Mat4, Vec3};
}
