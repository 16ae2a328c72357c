//! Per-state blend rules and the grounded state handlers.
//!
//! Every grounded state owns an ordered list of blend rules. The first rule
//! whose partner state matches the context's previous or current state decides
//! which clips play on the two tracks and how strongly they mix. When none
//! matches, the state's own clip plays alone on the main track.

use super::track::ClipSlot;
use super::track::ClipSlot::{Idle, Run, Sprint, Walk};
use super::ActorAnimationContext;
use crate::config::ActorSettings;
use crate::locomotion::LocomotionState;
use crate::locomotion::LocomotionState::{Running, Sprinting, StandIdle, Walking};

/// Interpolation weight for a blend: `speed / target_speed` clamped to
/// `[0, 1]`.
///
/// Non-positive or non-finite targets and NaN speeds yield `0`.
///
/// # Examples
/// ```
/// use stride::animation::blend_ratio;
/// assert!((blend_ratio(100.0, 200.0) - 0.5).abs() < f32::EPSILON);
/// assert!((blend_ratio(900.0, 200.0) - 1.0).abs() < f32::EPSILON);
/// assert_eq!(blend_ratio(50.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn blend_ratio(speed: f32, target_speed: f32) -> f32 {
    if speed.is_nan() || !target_speed.is_finite() || target_speed <= 0.0 {
        return 0.0;
    }
    (speed / target_speed).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partner {
    /// Matches when the previous or current state equals the given state.
    Either(LocomotionState),
    /// Always matches.
    Always,
}

impl Partner {
    fn matches(self, previous: LocomotionState, current: LocomotionState) -> bool {
        match self {
            Self::Either(state) => previous == state || current == state,
            Self::Always => true,
        }
    }
}

/// One cross-fade between a slower `base` clip on the main track and a faster
/// `overlay` clip on the blend track.
#[derive(Debug, Clone, Copy)]
struct BlendRule {
    partner: Partner,
    base: ClipSlot,
    overlay: ClipSlot,
    /// State whose target speed normalises the blend ratio.
    ratio_from: LocomotionState,
    /// Whether the overlay clip's playback speed follows the ratio.
    scale_overlay: bool,
}

const fn rule(
    partner: LocomotionState,
    base: ClipSlot,
    overlay: ClipSlot,
    ratio_from: LocomotionState,
    scale_overlay: bool,
) -> BlendRule {
    BlendRule {
        partner: Partner::Either(partner),
        base,
        overlay,
        ratio_from,
        scale_overlay,
    }
}

static STAND_IDLE_RULES: [BlendRule; 3] = [
    rule(Walking, Idle, Walk, Walking, false),
    rule(Running, Idle, Run, Running, false),
    rule(Sprinting, Idle, Sprint, Sprinting, false),
];

static WALKING_RULES: [BlendRule; 3] = [
    rule(StandIdle, Idle, Walk, Walking, true),
    rule(Running, Walk, Run, Running, true),
    rule(Sprinting, Walk, Sprint, Sprinting, true),
];

static RUNNING_RULES: [BlendRule; 3] = [
    rule(StandIdle, Idle, Run, Running, true),
    rule(Walking, Walk, Run, Running, true),
    rule(Sprinting, Run, Sprint, Sprinting, true),
];

static SPRINTING_RULES: [BlendRule; 1] = [BlendRule {
    partner: Partner::Always,
    base: Run,
    overlay: Sprint,
    ratio_from: Sprinting,
    scale_overlay: true,
}];

/// Blend rules and solo clip for a grounded state; `None` for the others.
fn grounded_table(state: LocomotionState) -> Option<(&'static [BlendRule], ClipSlot)> {
    match state {
        StandIdle => Some((&STAND_IDLE_RULES[..], Idle)),
        Walking => Some((&WALKING_RULES[..], Walk)),
        Running => Some((&RUNNING_RULES[..], Run)),
        Sprinting => Some((&SPRINTING_RULES[..], Sprint)),
        _ => None,
    }
}

/// Whether the blend engine animates `state` (as opposed to passing through).
#[must_use]
pub fn is_animated(state: LocomotionState) -> bool {
    grounded_table(state).is_some()
}

/// Runs the handler for a grounded `target` state, then latches it.
///
/// Returns `false` without touching the context when `target` has no
/// handler.
pub(super) fn run_grounded(
    context: &mut ActorAnimationContext,
    target: LocomotionState,
    horizontal_speed: f32,
    settings: &ActorSettings,
    frame_time: f32,
) -> bool {
    let Some((rules, solo)) = grounded_table(target) else {
        return false;
    };
    let matched = rules
        .iter()
        .find(|rule| rule.partner.matches(context.previous, context.current));

    if let Some(rule) = matched {
        let target_speed = rule.ratio_from.target_speed(settings).unwrap_or(0.0);
        let ratio = blend_ratio(horizontal_speed, target_speed);
        context.blend_ratio = ratio;

        context.main.advance(rule.base, frame_time);
        if rule.scale_overlay {
            context.blend.set_speed(rule.overlay, ratio);
        }
        context.blend.advance(rule.overlay, frame_time);
        context.main.blend_from(&context.blend, ratio);
        log::trace!(
            "{target:?}: blending {:?} -> {:?} at {ratio:.3}",
            rule.base,
            rule.overlay
        );
    } else {
        let target_speed = target.target_speed(settings).unwrap_or(0.0);
        context.blend_ratio = blend_ratio(horizontal_speed, target_speed);
        context.main.advance(solo, frame_time);
        log::trace!("{target:?}: playing {solo:?} alone");
    }

    context.latch(target);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 200.0, 0.0)]
    #[case(50.0, 200.0, 0.25)]
    #[case(200.0, 200.0, 1.0)]
    #[case(5000.0, 200.0, 1.0)]
    #[case(-10.0, 200.0, 0.0)]
    #[case(f32::INFINITY, 200.0, 1.0)]
    #[case(f32::NAN, 200.0, 0.0)]
    #[case(100.0, f32::INFINITY, 0.0)]
    fn ratio_stays_in_unit_range(#[case] speed: f32, #[case] target: f32, #[case] expected: f32) {
        let ratio = blend_ratio(speed, target);
        assert!((0.0..=1.0).contains(&ratio));
        assert!((ratio - expected).abs() < 1e-6);
    }

    #[rstest]
    #[case(StandIdle, true)]
    #[case(Sprinting, true)]
    #[case(LocomotionState::Roll, false)]
    #[case(LocomotionState::Jump, false)]
    #[case(LocomotionState::Falling, false)]
    #[case(LocomotionState::Empty, false)]
    fn only_grounded_states_animate(#[case] state: LocomotionState, #[case] expected: bool) {
        assert_eq!(is_animated(state), expected);
    }

    #[rstest]
    fn first_matching_rule_wins() {
        let matched = WALKING_RULES
            .iter()
            .find(|rule| rule.partner.matches(Running, StandIdle))
            .map(|rule| rule.base);
        assert_eq!(matched, Some(Idle));
    }

    #[rstest]
    fn every_overlay_is_faster_than_its_base() {
        let order = |slot: ClipSlot| match slot {
            Idle => 0,
            Walk => 1,
            Run => 2,
            Sprint => 3,
            _ => 99,
        };
        let tables = [
            &STAND_IDLE_RULES[..],
            &WALKING_RULES[..],
            &RUNNING_RULES[..],
            &SPRINTING_RULES[..],
        ];
        for rules in tables {
            for rule in rules {
                assert!(order(rule.base) < order(rule.overlay), "{rule:?}");
            }
        }
    }
}
