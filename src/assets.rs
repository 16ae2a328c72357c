//! In-memory model and clip data handed over by the asset collaborator.
//!
//! Nothing here parses files. A [`Model`] is built from already-decoded bones
//! and keyframes and validated once; clips are then shared by [`Arc`] between
//! every track that plays them.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Quat, Vec3};
use hashbrown::HashMap;
use thiserror::Error;

use crate::constants::{
    CLIP_FALL, CLIP_IDLE, CLIP_JOG, CLIP_JUMP, CLIP_LAND, CLIP_ROLL, CLIP_RUN, CLIP_SPRINT,
    CLIP_TRANSITION, CLIP_WALK,
};
use crate::pose::{Bone, BoneTransform, Pose, Skeleton};

/// Validation failures for model and clip data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    /// The model declares no bones.
    #[error("model has no bones")]
    EmptySkeleton,
    /// A bone's parent comes after it in hierarchy order.
    #[error("bone {bone} names parent {parent}, which does not precede it")]
    ParentOrder {
        /// Index of the offending bone.
        bone: usize,
        /// Index it names as parent.
        parent: usize,
    },
    /// A clip the actor cannot do without is absent.
    #[error("clip `{0}` is required but missing from the model")]
    MissingClip(String),
    /// A clip has no keyframes.
    #[error("clip `{clip}` has no keyframes")]
    NoKeyframes {
        /// Clip name.
        clip: String,
    },
    /// A clip's duration is non-finite or not positive.
    #[error("clip `{clip}` duration must be positive, got {duration}")]
    Duration {
        /// Clip name.
        clip: String,
        /// Rejected duration.
        duration: f32,
    },
    /// A keyframe time is out of order or past the clip's end.
    #[error("clip `{clip}` keyframe {index} is out of order or outside the clip")]
    KeyframeTime {
        /// Clip name.
        clip: String,
        /// Keyframe index.
        index: usize,
    },
    /// A keyframe does not cover every bone.
    #[error("clip `{clip}` keyframe {index} has {found} bones, skeleton has {expected}")]
    BoneCount {
        /// Clip name.
        clip: String,
        /// Keyframe index.
        index: usize,
        /// Bones in the skeleton.
        expected: usize,
        /// Bones in the keyframe.
        found: usize,
    },
}

/// One sampled pose at `time` seconds into a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Seconds from the start of the clip.
    pub time: f32,
    /// Local transform of every bone, in bone order.
    pub bones: Vec<BoneTransform>,
}

/// Keyframed animation for one skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    /// Creates a clip. Validation happens when it is added to a [`Model`].
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, keyframes: Vec<Keyframe>) -> Self {
        Self {
            name: name.into(),
            duration,
            keyframes,
        }
    }

    /// Name the clip is looked up by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in seconds.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Writes the clip's pose at `time` into `pose`.
    ///
    /// Looping clips interpolate from the last keyframe back to the first over
    /// the remainder of the duration; one-shot clips hold the last keyframe.
    pub fn sample_into(&self, time: f32, looping: bool, pose: &mut Pose) {
        let next = self.keyframes.partition_point(|key| key.time <= time);
        let previous = next.checked_sub(1).and_then(|index| self.keyframes.get(index));
        let (from, to, span_end) = match (previous, self.keyframes.get(next)) {
            (Some(from), Some(to)) => (from, to, to.time),
            (Some(from), None) => match self.keyframes.first() {
                Some(first) if looping => (from, first, self.duration),
                _ => (from, from, from.time),
            },
            (None, Some(to)) => (to, to, to.time),
            (None, None) => return,
        };
        let span = span_end - from.time;
        let weight = if span > 0.0 {
            ((time - from.time) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        for (out, (a, b)) in pose
            .bones_mut()
            .iter_mut()
            .zip(from.bones.iter().zip(&to.bones))
        {
            *out = a.lerp(b, weight);
        }
    }

    fn validate(&self, bone_count: usize) -> Result<(), AssetError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(AssetError::Duration {
                clip: self.name.clone(),
                duration: self.duration,
            });
        }
        if self.keyframes.is_empty() {
            return Err(AssetError::NoKeyframes {
                clip: self.name.clone(),
            });
        }
        let mut last_time = 0.0_f32;
        for (index, key) in self.keyframes.iter().enumerate() {
            if key.time < last_time || key.time > self.duration {
                return Err(AssetError::KeyframeTime {
                    clip: self.name.clone(),
                    index,
                });
            }
            last_time = key.time;
            if key.bones.len() != bone_count {
                return Err(AssetError::BoneCount {
                    clip: self.name.clone(),
                    index,
                    expected: bone_count,
                    found: key.bones.len(),
                });
            }
        }
        Ok(())
    }
}

/// A skeleton plus every clip authored for it.
#[derive(Debug, Clone)]
pub struct Model {
    skeleton: Skeleton,
    clips: HashMap<String, Arc<AnimationClip>>,
}

impl Model {
    /// Validates bones and clips and builds the model.
    ///
    /// # Errors
    /// Returns [`AssetError`] if the skeleton is empty, a bone's parent does
    /// not precede it, or any clip is malformed.
    pub fn new(bones: Vec<Bone>, clips: Vec<AnimationClip>) -> Result<Self, AssetError> {
        if bones.is_empty() {
            return Err(AssetError::EmptySkeleton);
        }
        for (bone, entry) in bones.iter().enumerate() {
            if let Some(parent) = entry.parent {
                if parent >= bone {
                    return Err(AssetError::ParentOrder { bone, parent });
                }
            }
        }
        let bone_count = bones.len();
        let mut by_name = HashMap::with_capacity(clips.len());
        for clip in clips {
            clip.validate(bone_count)?;
            by_name.insert(clip.name.clone(), Arc::new(clip));
        }
        log::debug!("model built with {bone_count} bones and {} clips", by_name.len());
        Ok(Self {
            skeleton: Skeleton::from_ordered_bones(bones),
            clips: by_name,
        })
    }

    /// The validated bone hierarchy.
    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Looks up a clip by name.
    #[must_use]
    pub fn clip(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name).cloned()
    }

    /// Looks up a clip the caller cannot do without.
    ///
    /// # Errors
    /// Returns [`AssetError::MissingClip`] when no clip has that name.
    pub fn require_clip(&self, name: &str) -> Result<Arc<AnimationClip>, AssetError> {
        self.clip(name)
            .ok_or_else(|| AssetError::MissingClip(name.to_owned()))
    }
}

/// Builds a chain skeleton of `bone_count` bones with procedurally generated
/// clips under every name the actor binds.
///
/// Each clip sways the chain about the x axis with its own amplitude and
/// period, so blends between any two clips are observable. Useful for
/// headless runs where no authored assets exist.
///
/// # Errors
/// Returns [`AssetError::EmptySkeleton`] when `bone_count` is zero.
pub fn procedural_model(bone_count: usize) -> Result<Model, AssetError> {
    let bones: Vec<Bone> = (0..bone_count)
        .map(|index| Bone {
            name: format!("bone-{index}"),
            parent: index.checked_sub(1),
            bind: if index == 0 {
                BoneTransform::IDENTITY
            } else {
                BoneTransform::from_translation(Vec3::Z)
            },
        })
        .collect();
    let clips = [
        (CLIP_IDLE, 0.05, 2.0),
        (CLIP_TRANSITION, 0.1, 0.5),
        (CLIP_WALK, 0.3, 1.2),
        (CLIP_JOG, 0.45, 0.8),
        (CLIP_RUN, 0.45, 0.8),
        (CLIP_SPRINT, 0.8, 0.6),
        (CLIP_ROLL, 1.2, 0.7),
        (CLIP_JUMP, 0.6, 0.4),
        (CLIP_FALL, 0.2, 1.0),
        (CLIP_LAND, 0.4, 0.3),
    ]
    .into_iter()
    .map(|(name, amplitude, duration)| sway_clip(name, &bones, amplitude, duration))
    .collect();
    Model::new(bones, clips)
}

fn sway_clip(name: &str, bones: &[Bone], amplitude: f32, duration: f32) -> AnimationClip {
    const KEYS: u16 = 8;
    let keyframes = (0..KEYS)
        .map(|key| {
            let phase = f32::from(key) / f32::from(KEYS);
            let pose = bones
                .iter()
                .zip(0_u16..)
                .map(|(bone, depth)| {
                    let angle = amplitude * (TAU * phase + 0.5 * f32::from(depth)).sin();
                    BoneTransform {
                        rotation: Quat::from_rotation_x(angle),
                        ..bone.bind
                    }
                })
                .collect();
            Keyframe {
                time: phase * duration,
                bones: pose,
            }
        })
        .collect();
    AnimationClip::new(name, duration, keyframes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn two_key_clip(bones: usize) -> AnimationClip {
        AnimationClip::new(
            "slide",
            1.0,
            vec![
                Keyframe {
                    time: 0.0,
                    bones: vec![BoneTransform::IDENTITY; bones],
                },
                Keyframe {
                    time: 0.5,
                    bones: vec![BoneTransform::from_translation(Vec3::X * 2.0); bones],
                },
            ],
        )
    }

    #[rstest]
    #[case::between_keys(0.25, true, 1.0)]
    #[case::wrapping_back(0.75, true, 1.0)]
    #[case::holding_last(0.75, false, 2.0)]
    fn samples_interpolate(#[case] time: f32, #[case] looping: bool, #[case] expected: f32) {
        let clip = two_key_clip(1);
        let mut pose = Pose::from_bones(vec![BoneTransform::IDENTITY]);
        clip.sample_into(time, looping, &mut pose);
        assert!((pose.bones()[0].translation.x - expected).abs() < 1e-5);
    }

    #[rstest]
    fn rejects_parent_after_child() {
        let bones = vec![
            Bone {
                name: "a".into(),
                parent: Some(1),
                bind: BoneTransform::IDENTITY,
            },
            Bone {
                name: "b".into(),
                parent: None,
                bind: BoneTransform::IDENTITY,
            },
        ];
        assert_eq!(
            Model::new(bones, Vec::new()).err(),
            Some(AssetError::ParentOrder { bone: 0, parent: 1 })
        );
    }

    #[rstest]
    fn rejects_bone_count_mismatch() {
        let bones = vec![Bone {
            name: "root".into(),
            parent: None,
            bind: BoneTransform::IDENTITY,
        }];
        let err = Model::new(bones, vec![two_key_clip(3)]).err();
        assert!(matches!(err, Some(AssetError::BoneCount { expected: 1, found: 3, .. })));
    }

    #[rstest]
    fn procedural_model_binds_every_clip() {
        let model = procedural_model(4).expect("procedural model");
        assert_eq!(model.skeleton().len(), 4);
        for name in [CLIP_IDLE, CLIP_WALK, CLIP_RUN, CLIP_SPRINT, CLIP_LAND] {
            assert!(model.clip(name).is_some(), "missing {name}");
        }
        assert!(matches!(
            model.require_clip("nope"),
            Err(AssetError::MissingClip(name)) if name == "nope"
        ));
    }

    #[rstest]
    fn procedural_model_needs_bones() {
        assert_eq!(procedural_model(0).err(), Some(AssetError::EmptySkeleton));
    }
}
