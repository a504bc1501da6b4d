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

//! Defines the `Plane` type used by the shadow and reflection matrix builders.

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Mat4, Quaternion, Vec3, Vec4};

/// A plane in 3D space, the set of points `p` where `normal.dot(p) + d == 0`.
///
/// The normal is stored as given. Operations that need a unit normal (such as
/// [`Mat4::shadow`] and [`Mat4::reflection`]) normalize internally.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
#[repr(C)]
pub struct Plane {
    /// The normal vector of the plane.
    pub normal: Vec3,
    /// The signed distance of the plane from the origin along its normal, negated.
    pub d: f32,
}

impl Plane {
    /// Creates a plane from a normal and the `d` term of its equation.
    #[inline]
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Creates a plane from the coefficients `(a, b, c, d)` of `ax + by + cz + d = 0`.
    #[inline]
    pub const fn from_vec4(v: Vec4) -> Self {
        Self::new(v.truncate(), v.w)
    }

    /// Creates the plane through three points.
    ///
    /// The normal follows the winding `p1 -> p2 -> p3` and is unit length.
    /// Collinear points produce a NaN normal.
    pub fn from_vertices(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let normal = (p2 - p1).cross(p3 - p1).normalize();
        Self::new(normal, -normal.dot(p1))
    }

    /// Returns the plane scaled so its normal has unit length.
    ///
    /// A plane whose normal is already unit length within `f32::EPSILON` is
    /// returned unchanged.
    pub fn normalize(&self) -> Self {
        let length_squared = self.normal.length_squared();
        if (length_squared - 1.0).abs() < f32::EPSILON {
            return *self;
        }
        let inv_length = 1.0 / length_squared.sqrt();
        Self::new(self.normal * inv_length, self.d * inv_length)
    }

    /// Computes the dot product of the plane coefficients with a homogeneous vector.
    #[inline]
    pub fn dot(&self, v: Vec4) -> f32 {
        self.normal.dot(v.truncate()) + self.d * v.w
    }

    /// Evaluates the plane equation at a point. For a normalized plane this is
    /// the signed distance from the plane.
    #[inline]
    pub fn dot_coordinate(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    /// Computes the dot product of the plane normal with a direction.
    #[inline]
    pub fn dot_normal(&self, direction: Vec3) -> f32 {
        self.normal.dot(direction)
    }

    /// Transforms a normalized plane by a matrix.
    ///
    /// Planes transform by the inverse transpose of the point transform; the
    /// inversion happens here, so a singular `m` yields a NaN plane.
    pub fn transform(&self, m: &Mat4) -> Self {
        let inv = m.invert().value;
        let Vec3 { x, y, z } = self.normal;
        let w = self.d;
        Self::new(
            Vec3::new(
                x * inv.m11 + y * inv.m12 + z * inv.m13 + w * inv.m14,
                x * inv.m21 + y * inv.m22 + z * inv.m23 + w * inv.m24,
                x * inv.m31 + y * inv.m32 + z * inv.m33 + w * inv.m34,
            ),
            x * inv.m41 + y * inv.m42 + z * inv.m43 + w * inv.m44,
        )
    }

    /// Rotates a normalized plane by a quaternion. The distance term is kept.
    #[inline]
    pub fn rotate(&self, rotation: Quaternion) -> Self {
        Self::new(self.normal.rotate(rotation), self.d)
    }
}
