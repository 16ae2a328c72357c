//! Blend engine behaviour: ratios, latching, cross-fades and the states that
//! have no animation yet.
use approx::assert_relative_eq;
use rstest::rstest;
use stride::animation::{set_animation, ActorAnimationContext, ClipSlot, PoseTrack};
use stride::{ActorSettings, LocomotionState};
use test_utils::{actor_in, sample_model};

use LocomotionState::{Empty, Falling, Jump, Roll, Running, Sprinting, StandIdle, Walking};

const DT: f32 = 1.0 / 60.0;

fn context_in(previous: LocomotionState, current: LocomotionState) -> ActorAnimationContext {
    let mut context = ActorAnimationContext::bind(&sample_model()).expect("fixture binds");
    context.previous = previous;
    context.current = current;
    context
}

#[rstest]
#[case(StandIdle, 0.0, 0.0)]
#[case(StandIdle, 120.0, 0.0)]
#[case(Walking, 100.0, 0.5)]
#[case(Walking, 800.0, 1.0)]
#[case(Running, 325.0, 0.5)]
#[case(Sprinting, 450.0, 0.5)]
#[case(Sprinting, f32::NAN, 0.0)]
fn solo_ratio_uses_the_state_target(
    #[case] state: LocomotionState,
    #[case] speed: f32,
    #[case] expected: f32,
) {
    let settings = ActorSettings::default();
    let mut context = context_in(state, state);
    context.apply_state(state, speed, &settings, DT);
    assert!((0.0..=1.0).contains(&context.blend_ratio));
    assert_relative_eq!(context.blend_ratio, expected, epsilon = 1e-6);
}

#[rstest]
#[case(Walking, StandIdle, 100.0, 0.5)]
#[case(Walking, Running, 325.0, 0.5)]
#[case(Running, Sprinting, 900.0, 1.0)]
#[case(StandIdle, Sprinting, 90.0, 0.1)]
fn paired_ratio_uses_the_faster_state(
    #[case] state: LocomotionState,
    #[case] partner: LocomotionState,
    #[case] speed: f32,
    #[case] expected: f32,
) {
    let settings = ActorSettings::default();
    let mut context = context_in(partner, partner);
    context.apply_state(state, speed, &settings, DT);
    assert_relative_eq!(context.blend_ratio, expected, epsilon = 1e-6);
}

#[rstest]
#[case(StandIdle)]
#[case(Walking)]
#[case(Running)]
#[case(Sprinting)]
fn re_entering_the_current_state_keeps_the_pair(#[case] state: LocomotionState) {
    let settings = ActorSettings::default();
    let mut context = context_in(StandIdle, state);
    context.apply_state(state, 150.0, &settings, DT);
    let ratio = context.blend_ratio;
    context.apply_state(state, 150.0, &settings, DT);

    assert_eq!(context.previous, StandIdle);
    assert_eq!(context.current, state);
    assert_relative_eq!(context.blend_ratio, ratio);
}

#[rstest]
fn entering_a_new_state_latches_the_old_one() {
    let settings = ActorSettings::default();
    let mut context = context_in(Empty, StandIdle);
    context.apply_state(Running, 200.0, &settings, DT);
    assert_eq!(context.previous, StandIdle);
    assert_eq!(context.current, Running);
}

#[rstest]
fn first_walking_frame_cross_fades_from_idle() {
    let model = sample_model();
    let settings = ActorSettings::default();
    let mut context = context_in(StandIdle, StandIdle);
    context.apply_state(Walking, 100.0, &settings, DT);

    let mut main = PoseTrack::bind(&model).expect("track binds");
    let mut blend = PoseTrack::bind(&model).expect("track binds");
    main.advance(ClipSlot::Idle, DT);
    blend.set_speed(ClipSlot::Walk, 0.5);
    blend.advance(ClipSlot::Walk, DT);
    main.blend_from(&blend, 0.5);

    assert_eq!(context.main.pose(), main.pose());
    assert_eq!(context.blend.pose(), blend.pose());
    assert_eq!(context.previous, StandIdle);
    assert_eq!(context.current, Walking);
}

#[rstest]
fn settled_walking_plays_the_walk_clip_alone() {
    let model = sample_model();
    let settings = ActorSettings::default();
    let mut context = context_in(Walking, Walking);
    let untouched_blend = context.blend.pose().clone();
    context.apply_state(Walking, 100.0, &settings, DT);

    let mut walk = PoseTrack::bind(&model).expect("track binds");
    walk.advance(ClipSlot::Walk, DT);

    assert_eq!(context.main.pose(), walk.pose());
    assert_eq!(context.blend.pose(), &untouched_blend);
}

#[rstest]
fn blended_pose_lies_between_its_sources() {
    let model = sample_model();
    let settings = ActorSettings::default();
    let mut context = context_in(StandIdle, StandIdle);
    context.apply_state(Walking, 100.0, &settings, DT);

    let mut idle = PoseTrack::bind(&model).expect("track binds");
    idle.advance(ClipSlot::Idle, DT);
    let blended = context.main.pose();
    assert_ne!(blended, idle.pose());
    assert_ne!(blended, context.blend.pose());
}

#[rstest]
#[case(Roll)]
#[case(Jump)]
#[case(Falling)]
fn states_without_animation_leave_everything_untouched(#[case] state: LocomotionState) {
    let mut actor = actor_in(state, Walking, Running, 320.0);
    set_animation(&mut actor, DT, None);
    let before = actor.animation.clone();
    let matrices = actor.render.pose_buffer().read().clone();

    set_animation(&mut actor, DT, None);
    let after = &actor.animation;
    assert_eq!(after.previous, before.previous);
    assert_eq!(after.current, before.current);
    assert_eq!(after.blend_ratio.to_bits(), before.blend_ratio.to_bits());
    assert_eq!(after.change_counter, before.change_counter);
    assert_eq!(after.synced, before.synced);
    assert_eq!(after.main.pose(), before.main.pose());
    assert_eq!(after.blend.pose(), before.blend.pose());

    // Only the commit counter moves.
    let shared = actor.render.pose_buffer();
    let buffer = shared.read();
    assert_eq!(buffer.generation(), matrices.generation() + 1);
    for (now, then) in buffer.matrices().iter().zip(matrices.matrices()) {
        let now_bits = now.to_cols_array().map(f32::to_bits);
        let then_bits = then.to_cols_array().map(f32::to_bits);
        assert_eq!(now_bits, then_bits);
    }
}

#[rstest]
#[should_panic(expected = "empty locomotion state")]
fn empty_state_is_a_caller_bug() {
    let mut actor = actor_in(Empty, StandIdle, StandIdle, 0.0);
    set_animation(&mut actor, DT, None);
}
