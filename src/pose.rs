//! Skeleton, local poses and the skinning matrix buffer.
//!
//! A [`Pose`] holds one local [`BoneTransform`] per bone and is what clips
//! write into and what blending mixes. A [`PoseBuffer`] holds the derived
//! skinning matrices the renderer reads.

use glam::{Mat4, Quat, Vec3};

/// Local transform of one bone relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    /// Offset from the parent bone.
    pub translation: Vec3,
    /// Orientation relative to the parent bone.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BoneTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Transform with only a translation.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Interpolates towards `other`: lerp for translation and scale, slerp
    /// for rotation.
    #[must_use]
    pub fn lerp(&self, other: &Self, weight: f32) -> Self {
        Self {
            translation: self.translation.lerp(other.translation, weight),
            rotation: self.rotation.slerp(other.rotation, weight),
            scale: self.scale.lerp(other.scale, weight),
        }
    }

    /// Matrix form of the transform.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// One bone of a [`Skeleton`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Name used in logs and by authoring tools.
    pub name: String,
    /// Index of the parent bone. Parents always precede their children.
    pub parent: Option<usize>,
    /// Local transform in the bind pose.
    pub bind: BoneTransform,
}

/// Bone hierarchy with its bind pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    inverse_bind: Vec<Mat4>,
}

impl Skeleton {
    /// Builds a skeleton and caches its inverse bind matrices.
    ///
    /// Callers must have checked that every parent precedes its child; see
    /// [`crate::assets::Model::new`].
    pub(crate) fn from_ordered_bones(bones: Vec<Bone>) -> Self {
        let bind_local: Vec<BoneTransform> = bones.iter().map(|bone| bone.bind).collect();
        let bind_world = world_matrices(&bones, &bind_local);
        let inverse_bind = bind_world.iter().map(Mat4::inverse).collect();
        Self {
            bones,
            inverse_bind,
        }
    }

    /// Bones in hierarchy order.
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Number of bones.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the skeleton has no bones.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// The bind pose as a local [`Pose`].
    #[must_use]
    pub fn bind_pose(&self) -> Pose {
        Pose {
            bones: self.bones.iter().map(|bone| bone.bind).collect(),
        }
    }
}

/// Local transforms for every bone of one skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    bones: Vec<BoneTransform>,
}

impl Pose {
    /// Pose from explicit bone transforms.
    #[must_use]
    pub const fn from_bones(bones: Vec<BoneTransform>) -> Self {
        Self { bones }
    }

    /// Local transforms in bone order.
    #[must_use]
    pub fn bones(&self) -> &[BoneTransform] {
        &self.bones
    }

    /// Mutable access used by clip sampling.
    pub fn bones_mut(&mut self) -> &mut [BoneTransform] {
        &mut self.bones
    }

    /// Blends `other` into `self` in place.
    ///
    /// A weight of `0` keeps `self`, `1` copies `other`. Bones beyond the
    /// shorter pose are left untouched.
    pub fn blend_toward(&mut self, other: &Self, weight: f32) {
        for (bone, target) in self.bones.iter_mut().zip(&other.bones) {
            *bone = bone.lerp(target, weight);
        }
    }
}

/// Skinning matrices consumed by the renderer, one per bone.
///
/// `generation` counts commits; readers use it to tell which frame's pose
/// they observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseBuffer {
    matrices: Vec<Mat4>,
    generation: u64,
}

impl PoseBuffer {
    /// Identity matrices for `bone_count` bones, generation zero.
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; bone_count],
            generation: 0,
        }
    }

    /// Skinning matrices in bone order.
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Number of commits applied so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Recomputes every skinning matrix from `pose` and bumps the generation.
    pub fn update_from(&mut self, skeleton: &Skeleton, pose: &Pose) {
        let world = world_matrices(&skeleton.bones, &pose.bones);
        self.matrices.clear();
        self.matrices.extend(
            world
                .iter()
                .zip(&skeleton.inverse_bind)
                .map(|(world, inverse_bind)| *world * *inverse_bind),
        );
        self.generation += 1;
    }
}

fn world_matrices(bones: &[Bone], locals: &[BoneTransform]) -> Vec<Mat4> {
    let mut world: Vec<Mat4> = Vec::with_capacity(bones.len());
    for (bone, local) in bones.iter().zip(locals) {
        let parent = bone
            .parent
            .and_then(|index| world.get(index))
            .copied()
            .unwrap_or(Mat4::IDENTITY);
        world.push(parent * local.to_mat4());
    }
    world
}
