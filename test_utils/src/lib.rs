//! Shared fixtures for the `stride` integration tests.
use std::sync::Arc;

use glam::Vec3;
use stride::{
    create_actor, procedural_model, Actor, ActorId, ActorInput, CoProcessor, InputSteering,
    IntentClassifier, LocomotionState, Model, Simulation,
};

/// Bones in the fixture skeleton.
pub const FIXTURE_BONES: usize = 4;

/// Procedural model used by every fixture.
///
/// # Panics
/// Panics if the procedural model fails validation.
pub fn sample_model() -> Arc<Model> {
    Arc::new(procedural_model(FIXTURE_BONES).expect("procedural model is valid"))
}

/// Fresh actor standing idle at the origin.
///
/// # Examples
/// ```
/// use test_utils::actor_at_rest;
/// let actor = actor_at_rest();
/// assert_eq!(actor.body.velocity, glam::Vec3::ZERO);
/// ```
///
/// # Panics
/// Panics if the actor cannot bind its clips.
pub fn actor_at_rest() -> Actor {
    create_actor(ActorId(1), sample_model()).expect("fixture actor binds its clips")
}

/// Actor in `state` whose animation context already latched
/// `previous`/`current`, moving at `speed` along -y.
pub fn actor_in(
    state: LocomotionState,
    previous: LocomotionState,
    current: LocomotionState,
    speed: f32,
) -> Actor {
    let mut actor = actor_at_rest();
    actor.state = state;
    actor.animation.previous = previous;
    actor.animation.current = current;
    actor.body.velocity = Vec3::new(0.0, -speed, 0.0);
    actor.horizontal_speed = speed;
    actor
}

/// Simulation with the reference collaborators and an optional co-processor
/// latency in milliseconds.
pub fn reference_simulation(
    latency_ms: u64,
) -> Simulation<InputSteering, IntentClassifier, CoProcessor> {
    Simulation::new(
        actor_at_rest(),
        InputSteering::default(),
        IntentClassifier,
        CoProcessor::with_latency(std::time::Duration::from_millis(latency_ms)),
    )
}

/// Input holding the stick straight ahead at `magnitude`.
pub fn forward(magnitude: f32) -> ActorInput {
    ActorInput::stick(0.0, magnitude)
}
