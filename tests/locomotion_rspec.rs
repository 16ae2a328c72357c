//! Behaviour-driven tests using rust-rspec.
//!
//! Scripted stick and jump input drives a full simulation with the reference
//! steering, classifier and co-processor.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::fmt;
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use glam::Vec3;
use rspec_runner::run_serial;
use stride::{ActorInput, CoProcessor, InputSteering, IntentClassifier, Simulation};
use stride::{FrameReport, LocomotionState};
use test_utils::{forward, reference_simulation};

type Sim = Simulation<InputSteering, IntentClassifier, CoProcessor>;

const DT: f32 = 1.0 / 60.0;

#[derive(Clone, Default)]
struct LocomotionWorld {
    simulation: Arc<Mutex<Option<Sim>>>,
    reports: Arc<Mutex<Vec<FrameReport>>>,
}

impl fmt::Debug for LocomotionWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reports = self.reports.lock().map(|r| r.len()).unwrap_or(0);
        f.debug_struct("LocomotionWorld")
            .field("reports", &reports)
            .finish_non_exhaustive()
    }
}

impl LocomotionWorld {
    fn setup(&mut self) {
        *self.simulation.lock().expect("simulation lock") = Some(reference_simulation(0));
        self.reports.lock().expect("reports lock").clear();
    }

    fn hold(&mut self, seconds: f32, input: impl Fn(f32) -> ActorInput) {
        let mut guard = self.simulation.lock().expect("simulation lock");
        let simulation = guard.as_mut().expect("simulation not set up");
        let mut reports = self.reports.lock().expect("reports lock");
        let frames = (seconds / DT).round() as u32;
        for frame in 0..frames {
            let elapsed = frame as f32 * DT;
            reports.push(simulation.step(input(elapsed), DT));
        }
    }

    fn with_actor<T>(&self, check: impl FnOnce(&stride::Actor) -> T) -> T {
        let guard = self.simulation.lock().expect("simulation lock");
        check(guard.as_ref().expect("simulation not set up").actor())
    }

    fn last_report(&self) -> FrameReport {
        *self
            .reports
            .lock()
            .expect("reports lock")
            .last()
            .expect("no frames stepped")
    }

    fn visited(&self, state: LocomotionState) -> bool {
        self.reports
            .lock()
            .expect("reports lock")
            .iter()
            .any(|report| report.state == state)
    }
}

#[test]
fn running_then_releasing_the_stick() {
    run_serial(&rspec::given(
        "an idle actor at the origin",
        LocomotionWorld::default(),
        |ctx| {
            ctx.before_each(|world| world.setup());
            ctx.when("the stick is pushed forward for three seconds", |ctx| {
                ctx.before_each(|world| world.hold(3.0, |_| forward(0.8)));
                ctx.then("the actor runs at the run speed along -y", |world| {
                    let report = world.last_report();
                    assert_eq!(report.state, LocomotionState::Running);
                    assert_relative_eq!(report.horizontal_speed, 650.0, max_relative = 1e-2);
                    assert!(report.blend_ratio > 0.99);
                    world.with_actor(|actor| {
                        assert!(actor.body.velocity.y < 0.0);
                        assert_relative_eq!(actor.body.heading(), 0.0, epsilon = 1e-2);
                    });
                });
                ctx.when("the stick is released for two seconds", |ctx| {
                    ctx.before_each(|world| world.hold(2.0, |_| ActorInput::default()));
                    ctx.then("the actor stops and stands idle", |world| {
                        let report = world.last_report();
                        assert_eq!(report.state, LocomotionState::StandIdle);
                        // The cached speed keeps its last moving value.
                        assert!(report.blend_ratio < 0.05);
                        world.with_actor(|actor| {
                            assert_eq!(actor.body.velocity, Vec3::ZERO);
                            assert_eq!(actor.previous_state, LocomotionState::Running);
                            assert_eq!(actor.animation.current, LocomotionState::StandIdle);
                            assert_eq!(actor.animation.previous, LocomotionState::Running);
                        });
                    });
                });
            });
        },
    ));
}

#[test]
fn jumping_and_landing() {
    run_serial(&rspec::given(
        "an idle actor on the ground",
        LocomotionWorld::default(),
        |ctx| {
            ctx.before_each(|world| world.setup());
            ctx.when("jump is held briefly and the actor is left alone", |ctx| {
                ctx.before_each(|world| {
                    world.hold(0.25, |held| ActorInput::default().with_jump_held(held));
                    world.hold(2.5, |_| ActorInput::default());
                });
                ctx.then("the actor went up, fell and landed", |world| {
                    assert!(world.visited(LocomotionState::Jump));
                    assert!(world.visited(LocomotionState::Falling));
                    let report = world.last_report();
                    assert!(report.grounded);
                    assert_eq!(report.state, LocomotionState::StandIdle);
                    world.with_actor(|actor| {
                        assert_eq!(actor.body.position.z, actor.grounding_height);
                        assert!(actor.body.velocity.z >= 0.0);
                    });
                });
                ctx.then("the pose kept committing through the air", |world| {
                    let report = world.last_report();
                    assert_eq!(report.pose_generation, report.frame + 1);
                });
            });
        },
    ));
}
