//! Actor integration tests.
use std::sync::Arc;

use glam::{Mat4, Vec3};
use stride::assets::{AnimationClip, Keyframe};
use stride::pose::{Bone, BoneTransform};
use stride::{
    compose_transform, create_actor, destroy_actor, ActorId, AssetError, LocomotionState, Model,
};
use test_utils::{actor_at_rest, sample_model};

fn still_clip(name: &str) -> AnimationClip {
    AnimationClip::new(
        name,
        1.0,
        vec![Keyframe {
            time: 0.0,
            bones: vec![BoneTransform::IDENTITY],
        }],
    )
}

#[test]
fn model_without_locomotion_clips_is_rejected() {
    let bones = vec![Bone {
        name: "root".into(),
        parent: None,
        bind: BoneTransform::IDENTITY,
    }];
    let model = Model::new(bones, vec![still_clip("idle-breathing-left")]).expect("valid model");
    let err = create_actor(ActorId(3), Arc::new(model)).expect_err("walk clip is missing");
    assert!(matches!(err, AssetError::MissingClip(_)), "got {err:?}");
}

#[test]
fn new_actor_has_an_identity_pose_buffer_sized_to_the_skeleton() {
    let model = sample_model();
    let actor = create_actor(ActorId(2), Arc::clone(&model)).expect("actor");
    let shared = actor.render.pose_buffer();
    let buffer = shared.read();
    assert_eq!(buffer.matrices().len(), model.skeleton().len());
    assert_eq!(buffer.generation(), 0);
    assert!(buffer.matrices().iter().all(|m| *m == Mat4::IDENTITY));
    assert_eq!(actor.previous_state, LocomotionState::Empty);
}

#[test]
fn transform_applies_scale_then_heading_then_position() {
    let mut actor = actor_at_rest();
    actor.scale = Vec3::splat(2.0);
    actor.body.rotation.z = 180.0;
    actor.body.position = Vec3::new(5.0, 0.0, 1.0);

    let matrix = compose_transform(&actor);
    let moved = matrix.transform_point3(Vec3::X);
    assert!(
        moved.abs_diff_eq(Vec3::new(3.0, 0.0, 1.0), 1e-4),
        "unexpected transform result {moved:?}"
    );
    assert_eq!(*actor.render.transform().read(), matrix);
}

#[test]
fn shared_buffers_outlive_the_actor_only_through_their_handles() {
    let actor = actor_at_rest();
    let transform = actor.render.transform();
    let pose = actor.render.pose_buffer();
    destroy_actor(actor);
    assert_eq!(Arc::strong_count(&transform), 1);
    assert_eq!(Arc::strong_count(&pose), 1);
}
