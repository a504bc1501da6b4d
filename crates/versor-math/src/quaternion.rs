// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for representing 3D rotations.

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Mat4, Vec3};
use std::ops::{Add, Div, Mul, MulAssign, Neg, Sub};

/// Below `1 - SLERP_EPSILON` for the cosine of the angle between two
/// quaternions, [`Quaternion::slerp`] falls back to normalized linear interpolation.
pub const SLERP_EPSILON: f32 = 1e-6;

/// Represents a quaternion for efficient 3D rotations.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the "vector" part
/// and `w` is the "scalar" part. A rotation of `θ` around a unit `axis` is
/// `(axis * sin(θ/2), cos(θ/2))`.
///
/// Unit length is **not** enforced: constructors do not normalize, and callers
/// that accumulate products should call [`normalize`](Self::normalize) themselves.
/// `q` and `-q` describe the same rotation but compare unequal, since equality
/// is component-wise.
///
/// # Composition
///
/// `a * b` is the Hamilton product. Rotating by `a * b` rotates by `b` first and
/// then by `a`, which matches `Mat4::from_quaternion(b) * Mat4::from_quaternion(a)`
/// under the row-vector convention. [`concatenate`](Self::concatenate) takes its
/// arguments in application order instead.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating rotations,
    /// prefer using `from_axis_angle` or other rotation-specific constructors.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion from a vector part and a scalar part.
    #[inline]
    pub const fn from_vec3(xyz: Vec3, w: f32) -> Self {
        Self::new(xyz.x, xyz.y, xyz.z, w)
    }

    /// Returns the vector part `[x, y, z]`.
    #[inline]
    pub const fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Creates a quaternion representing a rotation around a given axis by a given angle.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. It is used as given, so pass a unit vector
    ///   for a unit quaternion. A zero axis yields `(0, 0, 0, cos(angle / 2))`.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self::from_vec3(axis * s, c)
    }

    /// Creates a quaternion from yaw (around Y), pitch (around X) and roll (around Z).
    ///
    /// The result equals `yaw * pitch * roll`, i.e. roll is applied first, then
    /// pitch, then yaw. [`Mat4::from_yaw_pitch_roll`] builds the same rotation.
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self {
            x: cy * sp * cr + sy * cp * sr,
            y: sy * cp * cr - cy * sp * sr,
            z: cy * cp * sr - sy * sp * cr,
            w: cy * cp * cr + sy * sp * sr,
        }
    }

    /// Creates a quaternion from the rotation held in the upper 3x3 of `m`.
    ///
    /// The branch is chosen from the trace and the largest diagonal term so the
    /// square root is always taken of the largest available quantity. The upper
    /// 3x3 is assumed to be orthonormal; any scale must be removed beforehand.
    pub fn from_rotation_matrix(m: &Mat4) -> Self {
        let trace = m.m11 + m.m22 + m.m33;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt();
            let inv_s = 0.5 / s;
            Self {
                x: (m.m23 - m.m32) * inv_s,
                y: (m.m31 - m.m13) * inv_s,
                z: (m.m12 - m.m21) * inv_s,
                w: s * 0.5,
            }
        } else if m.m11 >= m.m22 && m.m11 >= m.m33 {
            let s = (1.0 + m.m11 - m.m22 - m.m33).sqrt();
            let inv_s = 0.5 / s;
            Self {
                x: 0.5 * s,
                y: (m.m12 + m.m21) * inv_s,
                z: (m.m13 + m.m31) * inv_s,
                w: (m.m23 - m.m32) * inv_s,
            }
        } else if m.m22 > m.m33 {
            let s = (1.0 + m.m22 - m.m11 - m.m33).sqrt();
            let inv_s = 0.5 / s;
            Self {
                x: (m.m21 + m.m12) * inv_s,
                y: 0.5 * s,
                z: (m.m32 + m.m23) * inv_s,
                w: (m.m31 - m.m13) * inv_s,
            }
        } else {
            let s = (1.0 + m.m33 - m.m11 - m.m22).sqrt();
            let inv_s = 0.5 / s;
            Self {
                x: (m.m31 + m.m13) * inv_s,
                y: (m.m32 + m.m23) * inv_s,
                z: 0.5 * s,
                w: (m.m12 - m.m21) * inv_s,
            }
        }
    }

    /// Returns `true` if this is exactly `(0, 0, 0, 1)`.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the quaternion scaled to unit length.
    ///
    /// A zero quaternion yields NaN in every component.
    #[inline]
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Computes the conjugate of the quaternion, which negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Computes the inverse of the quaternion, `conjugate / length_squared`.
    ///
    /// For a unit quaternion this equals the conjugate. A zero quaternion
    /// yields NaN in every component.
    #[inline]
    pub fn inverse(&self) -> Self {
        self.conjugate() / self.length_squared()
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Combines two rotations in application order: `first`, then `second`.
    ///
    /// Equal to `second * first`.
    #[inline]
    pub fn concatenate(first: Self, second: Self) -> Self {
        second * first
    }

    /// Performs a normalized linear interpolation between two quaternions.
    ///
    /// If the quaternions lie in opposite hemispheres, `end` is negated first so
    /// the interpolation follows the shortest arc. `t = 0` returns `start` and
    /// `t = 1` returns `end`, both unmodified.
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        if t == 0.0 {
            return start;
        }
        if t == 1.0 {
            return end;
        }

        let end_adjusted = if start.dot(end) < 0.0 { -end } else { end };
        (start * (1.0 - t) + end_adjusted * t).normalize()
    }

    /// Performs a Spherical Linear Interpolation (Slerp) between two quaternions.
    ///
    /// Slerp provides a smooth, constant-speed interpolation between two rotations,
    /// following the shortest path on the surface of a 4D sphere. When the inputs
    /// are nearly parallel the sine of the angle between them vanishes, and a
    /// normalized linear interpolation is used instead.
    ///
    /// `t` is not clamped. `t = 0` returns `start` and `t = 1` returns `end`,
    /// both unmodified.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        if t == 0.0 {
            return start;
        }
        if t == 1.0 {
            return end;
        }

        let mut cos_theta = start.dot(end);
        let mut end_adjusted = end;

        // Opposite hemispheres: take the shorter arc through -end.
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end_adjusted = -end;
        }

        if cos_theta > 1.0 - SLERP_EPSILON {
            return (start * (1.0 - t) + end_adjusted * t).normalize();
        }

        let angle = cos_theta.acos();
        let sin_theta_inv = 1.0 / angle.sin();
        let scale_start = ((1.0 - t) * angle).sin() * sin_theta_inv;
        let scale_end = (t * angle).sin() * sin_theta_inv;
        (start * scale_start) + (end_adjusted * scale_end)
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// Note that quaternion multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    /// Combines this rotation with another.
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div<Quaternion> for Quaternion {
    type Output = Self;
    /// Multiplies by the inverse of `rhs`.
    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.inverse()
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs.rotate(self)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a standard rotation operation.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Self;
    /// Subtracts two quaternions component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w - rhs.w,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
            w: self.w * scalar,
        }
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;
    /// Divides all components of the quaternion by a scalar.
    #[inline]
    fn div(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
            w: self.w / scalar,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components of the quaternion.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}
