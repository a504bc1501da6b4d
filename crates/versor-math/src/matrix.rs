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

//! Defines the `Mat4` type and associated operations.

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Outcome, Plane, ProjectionError, Quaternion, Vec3, Vec4, PI};
use crate::error::check_depth_range;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Scale magnitudes below this make [`Mat4::decompose`] fail. Also bounds the
/// squared deviation of the basis determinant from 1 before a matrix is
/// considered sheared.
pub const DECOMPOSE_EPSILON: f32 = 1e-4;

/// Squared distance under which [`Mat4::billboard`] treats the object and the
/// camera as coincident.
pub const BILLBOARD_EPSILON: f32 = 1e-4;

/// Cosine of 0.1 degrees, approximated. [`Mat4::constrained_billboard`] treats
/// directions whose dot product with the rotation axis exceeds this as parallel.
pub const BILLBOARD_MIN_ANGLE: f32 = 1.0 - 0.1 * (PI / 180.0);

/// Determinants with a magnitude below this make [`Mat4::invert`] fail.
pub const SINGULAR_DETERMINANT: f32 = f32::MIN_POSITIVE;

// --- Mat4 ---

/// A 4x4 row-major matrix for 3D affine and projective transformations.
///
/// Vectors are treated as rows and multiplied on the left (`v' = v * M`), so
/// the fourth row `(m41, m42, m43)` holds the translation and `a * b` applies
/// `a` first, then `b`.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
#[repr(C)]
pub struct Mat4 {
    /// Row 1, column 1.
    pub m11: f32,
    /// Row 1, column 2.
    pub m12: f32,
    /// Row 1, column 3.
    pub m13: f32,
    /// Row 1, column 4.
    pub m14: f32,
    /// Row 2, column 1.
    pub m21: f32,
    /// Row 2, column 2.
    pub m22: f32,
    /// Row 2, column 3.
    pub m23: f32,
    /// Row 2, column 4.
    pub m24: f32,
    /// Row 3, column 1.
    pub m31: f32,
    /// Row 3, column 2.
    pub m32: f32,
    /// Row 3, column 3.
    pub m33: f32,
    /// Row 3, column 4.
    pub m34: f32,
    /// Row 4, column 1 (translation X).
    pub m41: f32,
    /// Row 4, column 2 (translation Y).
    pub m42: f32,
    /// Row 4, column 3 (translation Z).
    pub m43: f32,
    /// Row 4, column 4.
    pub m44: f32,
}

/// The parts recovered by [`Mat4::decompose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    /// Per-axis scale. One component may be negative for mirrored matrices.
    pub scale: Vec3,
    /// The rotation, or [`Quaternion::IDENTITY`] when decomposition failed.
    pub rotation: Quaternion,
    /// The translation, taken from the fourth row.
    pub translation: Vec3,
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self::from_rows(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self::from_rows(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);

    /// Creates a new matrix from four row vectors.
    #[inline]
    pub const fn from_rows(r1: Vec4, r2: Vec4, r3: Vec4, r4: Vec4) -> Self {
        Self {
            m11: r1.x,
            m12: r1.y,
            m13: r1.z,
            m14: r1.w,
            m21: r2.x,
            m22: r2.y,
            m23: r2.z,
            m24: r2.w,
            m31: r3.x,
            m32: r3.y,
            m33: r3.z,
            m34: r3.w,
            m41: r4.x,
            m42: r4.y,
            m43: r4.z,
            m44: r4.w,
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    ///
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        match index {
            0 => Vec4::new(self.m11, self.m12, self.m13, self.m14),
            1 => Vec4::new(self.m21, self.m22, self.m23, self.m24),
            2 => Vec4::new(self.m31, self.m32, self.m33, self.m34),
            3 => Vec4::new(self.m41, self.m42, self.m43, self.m44),
            _ => panic!("Mat4 row index out of bounds: {}", index),
        }
    }

    /// Returns the sixteen elements in row-major order.
    #[inline]
    pub fn to_array(self) -> [f32; 16] {
        bytemuck::cast(self)
    }

    /// Creates a matrix from sixteen elements in row-major order.
    #[inline]
    pub fn from_array(elements: [f32; 16]) -> Self {
        bytemuck::cast(elements)
    }

    /// Applies `f` to each pair of corresponding elements.
    #[inline]
    fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let a = self.to_array();
        let b = other.to_array();
        Self::from_array(std::array::from_fn(|i| f(a[i], b[i])))
    }

    // --- Affine builders ---

    /// Creates a translation matrix.
    #[inline]
    pub const fn from_translation(position: Vec3) -> Self {
        Self::from_rows(Vec4::X, Vec4::Y, Vec4::Z, Vec4::from_vec3(position, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self::from_rows(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a uniform scaling matrix.
    #[inline]
    pub const fn from_uniform_scale(scale: f32) -> Self {
        Self::from_scale(Vec3::splat(scale))
    }

    /// Creates a scaling matrix that keeps `center` fixed.
    ///
    /// Equivalent to translating by `-center`, scaling, then translating back.
    pub fn from_scale_about(scale: Vec3, center: Vec3) -> Self {
        let mut m = Self::from_scale(scale);
        m.m41 = center.x * (1.0 - scale.x);
        m.m42 = center.y * (1.0 - scale.y);
        m.m43 = center.z * (1.0 - scale.z);
        m
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// A positive angle turns +Y toward +Z.
    #[inline]
    pub fn from_rotation_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation around the X-axis passing through `center`.
    pub fn from_rotation_x_about(angle_radians: f32, center: Vec3) -> Self {
        let (s, c) = angle_radians.sin_cos();
        let mut m = Self::from_rotation_x(angle_radians);
        m.m42 = center.y * (1.0 - c) + center.z * s;
        m.m43 = center.z * (1.0 - c) - center.y * s;
        m
    }

    /// Creates a matrix for a rotation around the Y-axis.
    ///
    /// A positive angle turns +Z toward +X.
    #[inline]
    pub fn from_rotation_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation around the Y-axis passing through `center`.
    pub fn from_rotation_y_about(angle_radians: f32, center: Vec3) -> Self {
        let (s, c) = angle_radians.sin_cos();
        let mut m = Self::from_rotation_y(angle_radians);
        m.m41 = center.x * (1.0 - c) - center.z * s;
        m.m43 = center.z * (1.0 - c) + center.x * s;
        m
    }

    /// Creates a matrix for a rotation around the Z-axis.
    ///
    /// A positive angle turns +X toward +Y.
    #[inline]
    pub fn from_rotation_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a rotation around the Z-axis passing through `center`.
    pub fn from_rotation_z_about(angle_radians: f32, center: Vec3) -> Self {
        let (s, c) = angle_radians.sin_cos();
        let mut m = Self::from_rotation_z(angle_radians);
        m.m41 = center.x * (1.0 - c) + center.y * s;
        m.m42 = center.y * (1.0 - c) - center.x * s;
        m
    }

    /// Creates a rotation of `angle_radians` around `axis` (Rodrigues' formula).
    ///
    /// The axis is expected to be unit length and is used as given.
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let Vec3 { x, y, z } = axis;
        let (sa, ca) = angle_radians.sin_cos();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);

        Self::from_rows(
            Vec4::new(
                xx + ca * (1.0 - xx),
                xy - ca * xy + sa * z,
                xz - ca * xz - sa * y,
                0.0,
            ),
            Vec4::new(
                xy - ca * xy - sa * z,
                yy + ca * (1.0 - yy),
                yz - ca * yz + sa * x,
                0.0,
            ),
            Vec4::new(
                xz - ca * xz + sa * y,
                yz - ca * yz - sa * x,
                zz + ca * (1.0 - zz),
                0.0,
            ),
            Vec4::W,
        )
    }

    /// Creates a rotation matrix from a quaternion.
    ///
    /// The quaternion is used as given; a non-unit quaternion also scales.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (xx, yy, zz) = (q.x * q.x, q.y * q.y, q.z * q.z);
        let (xy, wz, xz) = (q.x * q.y, q.z * q.w, q.z * q.x);
        let (wy, yz, wx) = (q.y * q.w, q.y * q.z, q.x * q.w);

        Self::from_rows(
            Vec4::new(
                1.0 - 2.0 * (yy + zz),
                2.0 * (xy + wz),
                2.0 * (xz - wy),
                0.0,
            ),
            Vec4::new(
                2.0 * (xy - wz),
                1.0 - 2.0 * (zz + xx),
                2.0 * (yz + wx),
                0.0,
            ),
            Vec4::new(
                2.0 * (xz + wy),
                2.0 * (yz - wx),
                1.0 - 2.0 * (yy + xx),
                0.0,
            ),
            Vec4::W,
        )
    }

    /// Creates a rotation from yaw (around Y), pitch (around X) and roll
    /// (around Z). Roll is applied first, then pitch, then yaw.
    #[inline]
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::from_quaternion(Quaternion::from_yaw_pitch_roll(yaw, pitch, roll))
    }

    // --- View and world builders ---

    /// Creates a right-handed view matrix looking from `eye` toward `target`.
    ///
    /// No validation is done: coincident `eye` and `target`, or an `up` parallel
    /// to the view direction, produce NaN.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        Self::from_rows(
            Vec4::new(x_axis.x, y_axis.x, z_axis.x, 0.0),
            Vec4::new(x_axis.y, y_axis.y, z_axis.y, 0.0),
            Vec4::new(x_axis.z, y_axis.z, z_axis.z, 0.0),
            Vec4::new(-x_axis.dot(eye), -y_axis.dot(eye), -z_axis.dot(eye), 1.0),
        )
    }

    /// Creates a world matrix placing an object at `position`, facing `forward`.
    ///
    /// The object's local -Z maps onto `forward`. This is the inverse of
    /// `look_at(position, position + forward, up)`.
    pub fn world(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        let z_axis = (-forward).normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        Self::from_rows(
            Vec4::from_vec3(x_axis, 0.0),
            Vec4::from_vec3(y_axis, 0.0),
            Vec4::from_vec3(z_axis, 0.0),
            Vec4::from_vec3(position, 1.0),
        )
    }

    // --- Projections ---

    /// Creates a right-handed orthographic projection with a [0, 1] depth range.
    ///
    /// Arguments are not validated.
    pub fn orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Self {
        let range = 1.0 / (z_near - z_far);
        Self::from_rows(
            Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, 0.0),
            Vec4::new(0.0, 0.0, z_near * range, 1.0),
        )
    }

    /// Creates a customized right-handed orthographic projection.
    ///
    /// Arguments are not validated.
    pub fn orthographic_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let range = 1.0 / (z_near - z_far);
        Self::from_rows(
            Vec4::new(2.0 / (right - left), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / (top - bottom), 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, 0.0),
            Vec4::new(
                (left + right) / (left - right),
                (top + bottom) / (bottom - top),
                z_near * range,
                1.0,
            ),
        )
    }

    /// Fills in the depth terms shared by every perspective projection.
    #[inline]
    fn with_perspective_depth(mut self, near: f32, far: f32) -> Self {
        let range = far / (near - far);
        self.m33 = range;
        self.m34 = -1.0;
        self.m43 = near * range;
        self.m44 = 0.0;
        self
    }

    /// Creates a right-handed perspective projection from the size of the view
    /// volume at the near plane.
    ///
    /// # Errors
    ///
    /// Returns an error when `near` or `far` is not positive or `near >= far`.
    pub fn perspective(
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        check_depth_range(near, far)
            .inspect_err(|err| log::debug!("Rejected perspective: {err}"))?;

        let mut m = Self::ZERO;
        m.m11 = 2.0 * near / width;
        m.m22 = 2.0 * near / height;
        Ok(m.with_perspective_depth(near, far))
    }

    /// Creates a right-handed perspective projection from a vertical field of view.
    ///
    /// # Arguments
    ///
    /// * `field_of_view`: Vertical field of view in radians, strictly between 0 and PI.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `near`: Distance to the near clipping plane (must be positive).
    /// * `far`: Distance to the far clipping plane (must be greater than `near`).
    ///
    /// # Errors
    ///
    /// Returns an error when any of the constraints above is violated.
    pub fn perspective_field_of_view(
        field_of_view: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        if !(field_of_view > 0.0 && field_of_view < PI) {
            let err = ProjectionError::FieldOfViewOutOfRange { field_of_view };
            log::debug!("Rejected perspective: {err}");
            return Err(err);
        }
        check_depth_range(near, far)
            .inspect_err(|err| log::debug!("Rejected perspective: {err}"))?;

        let y_scale = 1.0 / (field_of_view * 0.5).tan();
        let x_scale = y_scale / aspect_ratio;

        let mut m = Self::ZERO;
        m.m11 = x_scale;
        m.m22 = y_scale;
        Ok(m.with_perspective_depth(near, far))
    }

    /// Creates a customized right-handed perspective projection.
    ///
    /// # Errors
    ///
    /// Returns an error when `near` or `far` is not positive or `near >= far`.
    pub fn perspective_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        check_depth_range(near, far)
            .inspect_err(|err| log::debug!("Rejected perspective: {err}"))?;

        let mut m = Self::ZERO;
        m.m11 = 2.0 * near / (right - left);
        m.m22 = 2.0 * near / (top - bottom);
        m.m31 = (left + right) / (right - left);
        m.m32 = (top + bottom) / (top - bottom);
        Ok(m.with_perspective_depth(near, far))
    }

    // --- Plane-based builders ---

    /// Creates a matrix that flattens geometry onto `plane`, as if casting a
    /// shadow from a light shining along `light_direction`.
    ///
    /// Results are homogeneous: divide by `w` after transforming a point.
    pub fn shadow(light_direction: Vec3, plane: &Plane) -> Self {
        let p = plane.normalize();
        let dot = p.normal.dot(light_direction);
        let a = -p.normal.x;
        let b = -p.normal.y;
        let c = -p.normal.z;
        let d = -p.d;
        let l = light_direction;

        Self::from_rows(
            Vec4::new(a * l.x + dot, a * l.y, a * l.z, 0.0),
            Vec4::new(b * l.x, b * l.y + dot, b * l.z, 0.0),
            Vec4::new(c * l.x, c * l.y, c * l.z + dot, 0.0),
            Vec4::new(d * l.x, d * l.y, d * l.z, dot),
        )
    }

    /// Creates a matrix that mirrors geometry across `plane`.
    pub fn reflection(plane: &Plane) -> Self {
        let p = plane.normalize();
        let Vec3 { x: a, y: b, z: c } = p.normal;
        let fa = -2.0 * a;
        let fb = -2.0 * b;
        let fc = -2.0 * c;

        Self::from_rows(
            Vec4::new(fa * a + 1.0, fb * a, fc * a, 0.0),
            Vec4::new(fa * b, fb * b + 1.0, fc * b, 0.0),
            Vec4::new(fa * c, fb * c, fc * c + 1.0, 0.0),
            Vec4::new(fa * p.d, fb * p.d, fc * p.d, 1.0),
        )
    }

    // --- Billboards ---

    /// Creates a matrix that rotates an object at `object_position` to face a
    /// camera at `camera_position`.
    ///
    /// When the two positions coincide, the object faces along
    /// `-camera_forward` instead.
    pub fn billboard(
        object_position: Vec3,
        camera_position: Vec3,
        camera_up: Vec3,
        camera_forward: Vec3,
    ) -> Self {
        let z_axis = Self::facing_direction(object_position, camera_position, camera_forward);
        let x_axis = camera_up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        Self::from_basis(x_axis, y_axis, z_axis, object_position)
    }

    /// Creates a matrix that rotates an object at `object_position` around
    /// `rotate_axis` so it faces a camera at `camera_position` as closely as
    /// the axis allows.
    ///
    /// When the camera direction is nearly parallel to `rotate_axis`,
    /// `object_forward` is used; when that is parallel too, a fixed axis is.
    pub fn constrained_billboard(
        object_position: Vec3,
        camera_position: Vec3,
        rotate_axis: Vec3,
        camera_forward: Vec3,
        object_forward: Vec3,
    ) -> Self {
        let face_direction =
            Self::facing_direction(object_position, camera_position, camera_forward);
        let y_axis = rotate_axis;

        let (x_axis, z_axis) = if rotate_axis.dot(face_direction).abs() > BILLBOARD_MIN_ANGLE {
            let mut z_axis = object_forward;
            if rotate_axis.dot(z_axis).abs() > BILLBOARD_MIN_ANGLE {
                log::trace!(
                    "Constrained billboard: object forward parallel to axis, using default"
                );
                z_axis = if rotate_axis.z.abs() > BILLBOARD_MIN_ANGLE {
                    Vec3::X
                } else {
                    -Vec3::Z
                };
            }
            let x_axis = rotate_axis.cross(z_axis).normalize();
            (x_axis, x_axis.cross(rotate_axis).normalize())
        } else {
            let x_axis = rotate_axis.cross(face_direction).normalize();
            (x_axis, x_axis.cross(y_axis).normalize())
        };

        Self::from_basis(x_axis, y_axis, z_axis, object_position)
    }

    /// Normalized direction from the camera to the object, or `-camera_forward`
    /// when they coincide.
    fn facing_direction(
        object_position: Vec3,
        camera_position: Vec3,
        camera_forward: Vec3,
    ) -> Vec3 {
        let offset = object_position - camera_position;
        let length_squared = offset.length_squared();
        if length_squared < BILLBOARD_EPSILON {
            log::trace!("Billboard: object and camera coincide, using camera forward");
            -camera_forward
        } else {
            offset * (1.0 / length_squared.sqrt())
        }
    }

    #[inline]
    const fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, position: Vec3) -> Self {
        Self::from_rows(
            Vec4::from_vec3(x_axis, 0.0),
            Vec4::from_vec3(y_axis, 0.0),
            Vec4::from_vec3(z_axis, 0.0),
            Vec4::from_vec3(position, 1.0),
        )
    }

    // --- Algebra ---

    /// Returns the transpose of the matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows(
            Vec4::new(self.m11, self.m21, self.m31, self.m41),
            Vec4::new(self.m12, self.m22, self.m32, self.m42),
            Vec4::new(self.m13, self.m23, self.m33, self.m43),
            Vec4::new(self.m14, self.m24, self.m34, self.m44),
        )
    }

    /// Computes the determinant of the matrix by cofactor expansion along the
    /// first row.
    pub fn determinant(&self) -> f32 {
        let (a, b, c, d) = (self.m11, self.m12, self.m13, self.m14);
        let (e, f, g, h) = (self.m21, self.m22, self.m23, self.m24);
        let (i, j, k, l) = (self.m31, self.m32, self.m33, self.m34);
        let (m, n, o, p) = (self.m41, self.m42, self.m43, self.m44);

        let kp_lo = k * p - l * o;
        let jp_ln = j * p - l * n;
        let jo_kn = j * o - k * n;
        let ip_lm = i * p - l * m;
        let io_km = i * o - k * m;
        let in_jm = i * n - j * m;

        a * (f * kp_lo - g * jp_ln + h * jo_kn) - b * (e * kp_lo - g * ip_lm + h * io_km)
            + c * (e * jp_ln - f * ip_lm + h * in_jm)
            - d * (e * jo_kn - f * io_km + g * in_jm)
    }

    /// Computes the inverse of the matrix.
    ///
    /// When the determinant is too close to zero the outcome is a failure and
    /// every element of the carried matrix is NaN.
    pub fn invert(&self) -> Outcome<Self> {
        let (a, b, c, d) = (self.m11, self.m12, self.m13, self.m14);
        let (e, f, g, h) = (self.m21, self.m22, self.m23, self.m24);
        let (i, j, k, l) = (self.m31, self.m32, self.m33, self.m34);
        let (m, n, o, p) = (self.m41, self.m42, self.m43, self.m44);

        let kp_lo = k * p - l * o;
        let jp_ln = j * p - l * n;
        let jo_kn = j * o - k * n;
        let ip_lm = i * p - l * m;
        let io_km = i * o - k * m;
        let in_jm = i * n - j * m;

        let a11 = f * kp_lo - g * jp_ln + h * jo_kn;
        let a12 = -(e * kp_lo - g * ip_lm + h * io_km);
        let a13 = e * jp_ln - f * ip_lm + h * in_jm;
        let a14 = -(e * jo_kn - f * io_km + g * in_jm);

        let det = a * a11 + b * a12 + c * a13 + d * a14;
        if det.abs() < SINGULAR_DETERMINANT {
            log::trace!("Matrix inversion failed: determinant {det} is singular");
            return Outcome::failure(Self::from_array([f32::NAN; 16]));
        }
        let inv_det = 1.0 / det;

        let gp_ho = g * p - h * o;
        let fp_hn = f * p - h * n;
        let fo_gn = f * o - g * n;
        let ep_hm = e * p - h * m;
        let eo_gm = e * o - g * m;
        let en_fm = e * n - f * m;

        let gl_hk = g * l - h * k;
        let fl_hj = f * l - h * j;
        let fk_gj = f * k - g * j;
        let el_hi = e * l - h * i;
        let ek_gi = e * k - g * i;
        let ej_fi = e * j - f * i;

        Outcome::success(Self {
            m11: a11 * inv_det,
            m21: a12 * inv_det,
            m31: a13 * inv_det,
            m41: a14 * inv_det,

            m12: -(b * kp_lo - c * jp_ln + d * jo_kn) * inv_det,
            m22: (a * kp_lo - c * ip_lm + d * io_km) * inv_det,
            m32: -(a * jp_ln - b * ip_lm + d * in_jm) * inv_det,
            m42: (a * jo_kn - b * io_km + c * in_jm) * inv_det,

            m13: (b * gp_ho - c * fp_hn + d * fo_gn) * inv_det,
            m23: -(a * gp_ho - c * ep_hm + d * eo_gm) * inv_det,
            m33: (a * fp_hn - b * ep_hm + d * en_fm) * inv_det,
            m43: -(a * fo_gn - b * eo_gm + c * en_fm) * inv_det,

            m14: -(b * gl_hk - c * fl_hj + d * fk_gj) * inv_det,
            m24: (a * gl_hk - c * el_hi + d * ek_gi) * inv_det,
            m34: -(a * fl_hj - b * el_hi + d * ej_fi) * inv_det,
            m44: (a * fk_gj - b * ek_gi + c * ej_fi) * inv_det,
        })
    }

    /// Computes the inverse of the matrix.
    /// Returns `None` if the matrix is not invertible.
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.invert().into_option()
    }

    /// Splits an affine matrix into scale, rotation and translation, such that
    /// `from_scale(scale) * from_quaternion(rotation) * from_translation(translation)`
    /// rebuilds it.
    ///
    /// Fails when any scale component is smaller than [`DECOMPOSE_EPSILON`] or
    /// the basis is sheared. A failed outcome still carries the scale and
    /// translation, with an identity rotation.
    pub fn decompose(&self) -> Outcome<Decomposition> {
        let translation = self.translation();
        let mut basis = [
            self.row(0).truncate(),
            self.row(1).truncate(),
            self.row(2).truncate(),
        ];
        let mut scale = basis.map(|axis| axis.length());

        let degenerate = |scale: [f32; 3]| Decomposition {
            scale: Vec3::from(scale),
            rotation: Quaternion::IDENTITY,
            translation,
        };

        if scale.iter().any(|s| s.abs() < DECOMPOSE_EPSILON) {
            log::trace!("Decompose failed: degenerate scale {scale:?}");
            return Outcome::failure(degenerate(scale));
        }

        for (axis, s) in basis.iter_mut().zip(scale) {
            *axis = *axis / s;
        }

        let mut det = basis[0].dot(basis[1].cross(basis[2]));
        if det < 0.0 {
            // Mirrored: push the reflection into the largest scale axis.
            let largest = (0..3)
                .max_by(|&a, &b| scale[a].abs().total_cmp(&scale[b].abs()))
                .unwrap_or(0);
            scale[largest] = -scale[largest];
            basis[largest] = -basis[largest];
            det = -det;
        }

        if (det - 1.0) * (det - 1.0) > DECOMPOSE_EPSILON {
            log::trace!("Decompose failed: basis is sheared (determinant {det})");
            return Outcome::failure(degenerate(scale));
        }

        let rotation_matrix = Self::from_basis(basis[0], basis[1], basis[2], Vec3::ZERO);
        Outcome::success(Decomposition {
            scale: Vec3::from(scale),
            rotation: Quaternion::from_rotation_matrix(&rotation_matrix),
            translation,
        })
    }

    /// Linearly interpolates between two matrices, element by element.
    ///
    /// `t` is not clamped.
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        start.zip_with(end, |a, b| a + (b - a) * t)
    }

    /// Applies a rotation after this transform: `self * from_quaternion(rotation)`.
    #[inline]
    pub fn transform(&self, rotation: Quaternion) -> Self {
        *self * Self::from_quaternion(rotation)
    }

    /// Returns the translation stored in the fourth row.
    #[inline]
    pub const fn translation(&self) -> Vec3 {
        Vec3::new(self.m41, self.m42, self.m43)
    }

    /// Overwrites the translation, leaving every other element untouched.
    #[inline]
    pub fn set_translation(&mut self, translation: Vec3) {
        self.m41 = translation.x;
        self.m42 = translation.y;
        self.m43 = translation.z;
    }

    /// Returns `true` if the matrix is exactly the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

// --- Operators Overloading ---

impl Default for Mat4 {
    /// Returns the identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Mat4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for Mat4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Mat4 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl SubAssign for Mat4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Mat4 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_array(self.to_array().map(|v| -v))
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;
    /// Multiplies two matrices. Under the row-vector convention,
    /// `v * (a * b)` applies `a` first, then `b`.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::from_rows(
            self.row(0) * rhs,
            self.row(1) * rhs,
            self.row(2) * rhs,
            self.row(3) * rhs,
        )
    }
}

impl MulAssign<Mat4> for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::from_array(self.to_array().map(|v| v * rhs))
    }
}

impl MulAssign<f32> for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

/// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{degrees_to_radians, EPSILON, FRAC_PI_2, FRAC_PI_4};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample_affine() -> Mat4 {
        Mat4::from_scale(Vec3::new(1.0, 2.0, 0.5))
            * Mat4::from_rotation_y(FRAC_PI_4)
            * Mat4::from_rotation_x(0.3)
            * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
    }

    #[test]
    fn test_layout_is_row_major() {
        assert_eq!(std::mem::size_of::<Mat4>(), 64);
        let m = Mat4::from_array(std::array::from_fn(|i| i as f32));
        assert_eq!(m.m12, 1.0);
        assert_eq!(m.m21, 4.0);
        assert_eq!(m.m44, 15.0);
        assert_eq!(m.row(2), Vec4::new(8.0, 9.0, 10.0, 11.0));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bounds() {
        let _ = Mat4::IDENTITY.row(4);
    }

    #[test]
    fn test_identity() {
        assert!(Mat4::IDENTITY.is_identity());
        assert!(Mat4::default().is_identity());
        assert_eq!(Mat4::IDENTITY * Mat4::IDENTITY, Mat4::IDENTITY);

        let mut nan = Mat4::IDENTITY;
        nan.m23 = f32::NAN;
        assert!(!nan.is_identity());
        assert_ne!(nan, nan);
    }

    #[test]
    fn test_from_scale() {
        let m = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(Vec3::ONE.transform(&m), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(Mat4::from_uniform_scale(2.0), Mat4::from_scale(Vec3::splat(2.0)));
    }

    #[test]
    fn test_from_scale_about_keeps_center_fixed() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let scale = Vec3::new(2.0, 3.0, 4.0);
        let m = Mat4::from_scale_about(scale, center);
        assert_eq!(center.transform(&m), center);

        let composed = Mat4::from_translation(-center)
            * Mat4::from_scale(scale)
            * Mat4::from_translation(center);
        assert_relative_eq!(m, composed, epsilon = EPSILON);
    }

    #[test]
    fn test_rotations_follow_right_hand_rule() {
        assert_abs_diff_eq!(
            Vec3::Y.transform(&Mat4::from_rotation_x(FRAC_PI_2)),
            Vec3::Z,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec3::Z.transform(&Mat4::from_rotation_y(FRAC_PI_2)),
            Vec3::X,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec3::X.transform(&Mat4::from_rotation_z(FRAC_PI_2)),
            Vec3::Y,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_rotations_about_center() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let angle = 0.7;
        let builders: [(fn(f32) -> Mat4, fn(f32, Vec3) -> Mat4); 3] = [
            (Mat4::from_rotation_x, Mat4::from_rotation_x_about),
            (Mat4::from_rotation_y, Mat4::from_rotation_y_about),
            (Mat4::from_rotation_z, Mat4::from_rotation_z_about),
        ];
        for (around_origin, around_center) in builders {
            let m = around_center(angle, center);
            assert_abs_diff_eq!(center.transform(&m), center, epsilon = EPSILON);

            let composed = Mat4::from_translation(-center)
                * around_origin(angle)
                * Mat4::from_translation(center);
            assert_abs_diff_eq!(m, composed, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_from_axis_angle_matches_principal_rotations() {
        let angle = degrees_to_radians(30.0);
        assert_abs_diff_eq!(
            Mat4::from_axis_angle(Vec3::X, angle),
            Mat4::from_rotation_x(angle),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Mat4::from_axis_angle(Vec3::Y, angle),
            Mat4::from_rotation_y(angle),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Mat4::from_axis_angle(Vec3::Z, angle),
            Mat4::from_rotation_z(angle),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_from_axis_angle_matches_quaternion() {
        let axis = Vec3::new(1.0, 2.0, -3.0).normalize();
        let angle = 1.234;
        assert_abs_diff_eq!(
            Mat4::from_axis_angle(axis, angle),
            Mat4::from_quaternion(Quaternion::from_axis_angle(axis, angle)),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_yaw_pitch_roll_order() {
        let (yaw, pitch, roll) = (0.3, -0.8, 1.1);
        let expected = Mat4::from_rotation_z(roll)
            * Mat4::from_rotation_x(pitch)
            * Mat4::from_rotation_y(yaw);
        assert_abs_diff_eq!(
            Mat4::from_yaw_pitch_roll(yaw, pitch, roll),
            expected,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_multiplication_applies_left_first() {
        let scale = Mat4::from_uniform_scale(2.0);
        let translate = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(p.transform(&(scale * translate)), Vec3::new(3.0, 2.0, 2.0));
        assert_eq!(p.transform(&(translate * scale)), Vec3::new(4.0, 2.0, 2.0));

        let mut m = scale;
        m *= translate;
        assert_eq!(m, scale * translate);
    }

    #[test]
    fn test_component_wise_arithmetic() {
        let a = Mat4::from_array(std::array::from_fn(|i| i as f32));
        let b = Mat4::from_array([1.0; 16]);
        assert_eq!((a + b).m44, 16.0);
        assert_eq!((a - b).m11, -1.0);
        assert_eq!((-a).m12, -1.0);
        assert_eq!((a * 2.0).m21, 8.0);

        let mut c = a;
        c += b;
        c -= b;
        c *= 1.0;
        assert_eq!(c, a);
    }

    #[test]
    fn test_lerp_is_unclamped() {
        let a = Mat4::ZERO;
        let b = Mat4::from_array([2.0; 16]);
        assert_eq!(Mat4::lerp(a, b, 0.5), Mat4::from_array([1.0; 16]));
        assert_eq!(Mat4::lerp(a, b, 2.0), Mat4::from_array([4.0; 16]));
    }

    #[test]
    fn test_transpose() {
        let m = Mat4::from_array(std::array::from_fn(|i| i as f32));
        let t = m.transpose();
        assert_eq!(t.m12, m.m21);
        assert_eq!(t.m43, m.m34);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_translation_accessors() {
        let mut m = Mat4::from_rotation_z(0.5);
        let before = m;
        m.set_translation(Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(m.translation(), Vec3::new(7.0, 8.0, 9.0));

        let mut a = m.to_array();
        let b = before.to_array();
        a[12..15].copy_from_slice(&b[12..15]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_transform_by_quaternion() {
        let q = Quaternion::from_axis_angle(Vec3::Y, 0.4);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform(q), m * Mat4::from_quaternion(q));
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Mat4::IDENTITY.determinant(), 1.0);
        assert_eq!(Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0)).determinant(), 24.0);
        assert_relative_eq!(Mat4::from_rotation_y(1.0).determinant(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(sample_affine().determinant(), 1.0, epsilon = EPSILON);

        let sequential = Mat4::from_array(std::array::from_fn(|i| (i + 1) as f32));
        assert_eq!(sequential.determinant(), 0.0);
    }

    #[test]
    fn test_invert() {
        let m = sample_affine();
        let inv = m.invert();
        assert!(inv.success);
        assert_abs_diff_eq!(m * inv.value, Mat4::IDENTITY, epsilon = EPSILON);
        assert_abs_diff_eq!(inv.value * m, Mat4::IDENTITY, epsilon = EPSILON);
        assert_eq!(m.inverse(), Some(inv.value));
    }

    #[test]
    fn test_invert_projective() {
        let m = Mat4::perspective_field_of_view(PI / 3.0, 1.5, 1.0, 10.0).unwrap();
        let inv = m.inverse().expect("projection should be invertible");
        assert_abs_diff_eq!(m * inv, Mat4::IDENTITY, epsilon = 1e-4);
    }

    #[test]
    fn test_invert_singular_fills_nan() {
        let sequential = Mat4::from_array(std::array::from_fn(|i| (i + 1) as f32));
        let outcome = sequential.invert();
        assert!(!outcome.success);
        assert!(outcome.value.to_array().iter().all(|v| v.is_nan()));
        assert!(sequential.inverse().is_none());
        assert!(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn test_decompose_simple() {
        let scale = Vec3::new(2.0, 3.0, 4.0);
        let rotation = Quaternion::from_axis_angle(Vec3::Z, 0.5);
        let translation = Vec3::new(10.0, 20.0, 30.0);
        let m = Mat4::from_scale(scale)
            * Mat4::from_quaternion(rotation)
            * Mat4::from_translation(translation);

        let outcome = m.decompose();
        assert!(outcome.success);
        assert_relative_eq!(outcome.value.scale, scale, epsilon = 1e-4);
        assert_relative_eq!(outcome.value.translation, translation, epsilon = EPSILON);
        assert_abs_diff_eq!(
            Mat4::from_quaternion(outcome.value.rotation),
            Mat4::from_quaternion(rotation),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_decompose_mirrored_flips_largest_scale() {
        let m = Mat4::from_scale(Vec3::new(-2.0, 3.0, 4.0));
        let outcome = m.decompose();
        assert!(outcome.success);
        let Decomposition { scale, rotation, .. } = outcome.value;
        assert_eq!(scale, Vec3::new(2.0, 3.0, -4.0));

        let rebuilt = Mat4::from_scale(scale) * Mat4::from_quaternion(rotation);
        assert_abs_diff_eq!(rebuilt, m, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_degenerate_scale() {
        let mut m = Mat4::from_scale(Vec3::new(1.0, 1e-6, 1.0));
        m.set_translation(Vec3::new(1.0, 2.0, 3.0));
        let outcome = m.decompose();
        assert!(!outcome.success);
        assert_eq!(outcome.value.rotation, Quaternion::IDENTITY);
        assert_eq!(outcome.value.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(outcome.value.scale.x, 1.0);
    }

    #[test]
    fn test_decompose_sheared_fails() {
        let mut m = Mat4::IDENTITY;
        m.m21 = 1.0;
        let outcome = m.decompose();
        assert!(!outcome.success);
        assert_eq!(outcome.value.rotation, Quaternion::IDENTITY);
    }

    #[test]
    fn test_look_at() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);
        assert_abs_diff_eq!(
            Vec3::ZERO.transform(&view),
            Vec3::new(0.0, 0.0, -5.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(eye.transform(&view), Vec3::ZERO, epsilon = EPSILON);
    }

    #[test]
    fn test_world_inverts_look_at() {
        let position = Vec3::new(10.0, 20.0, 30.0);
        let forward = Vec3::new(1.0, -0.5, -2.0).normalize();
        let up = Vec3::Y;

        let world = Mat4::world(position, forward, up);
        assert_eq!(world.translation(), position);
        assert_abs_diff_eq!((-Vec3::Z).transform_normal(&world), forward, epsilon = EPSILON);

        let view = Mat4::look_at(position, position + forward, up);
        assert_abs_diff_eq!(world * view, Mat4::IDENTITY, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_field_of_view() {
        let m = Mat4::perspective_field_of_view(FRAC_PI_2, 2.0, 1.0, 10.0).unwrap();
        assert_relative_eq!(m.m22, 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.m11, 0.5, epsilon = EPSILON);
        assert_eq!(m.m34, -1.0);
        assert_eq!(m.m44, 0.0);

        // Near plane maps to depth 0, far plane to depth 1.
        let near = Vec4::new(0.0, 0.0, -1.0, 1.0).transform(&m);
        let far = Vec4::new(0.0, 0.0, -10.0, 1.0).transform(&m);
        assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_validation() {
        for fov in [-1.0, 0.0, PI, PI + 0.01] {
            assert_eq!(
                Mat4::perspective_field_of_view(fov, 1.0, 1.0, 10.0),
                Err(ProjectionError::FieldOfViewOutOfRange { field_of_view: fov })
            );
        }
        assert_eq!(
            Mat4::perspective_field_of_view(1.0, 1.0, -1.0, 10.0),
            Err(ProjectionError::NonPositiveNearPlane { near: -1.0 })
        );
        assert_eq!(
            Mat4::perspective(1.0, 1.0, 1.0, -10.0),
            Err(ProjectionError::NonPositiveFarPlane { far: -10.0 })
        );
        assert_eq!(
            Mat4::perspective_off_center(-1.0, 1.0, -1.0, 1.0, 10.0, 1.0),
            Err(ProjectionError::NearPlaneNotBeforeFar { near: 10.0, far: 1.0 })
        );
        assert!(Mat4::perspective_field_of_view(1.0, 1.0, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_perspective_off_center_matches_symmetric() {
        let symmetric = Mat4::perspective(4.0, 2.0, 1.0, 100.0).unwrap();
        let off_center = Mat4::perspective_off_center(-2.0, 2.0, -1.0, 1.0, 1.0, 100.0).unwrap();
        assert_eq!(symmetric, off_center);
    }

    #[test]
    fn test_orthographic_does_not_validate() {
        let swapped = Mat4::orthographic(2.0, 2.0, 10.0, 1.0);
        assert!(swapped.to_array().iter().all(|v| v.is_finite()));
        let flat = Mat4::orthographic(2.0, 2.0, 1.0, 1.0);
        assert!(flat.m33.is_infinite());

        let ortho = Mat4::orthographic(4.0, 2.0, 0.0, 10.0);
        let off_center = Mat4::orthographic_off_center(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);
        assert_abs_diff_eq!(ortho, off_center, epsilon = EPSILON);
        let far = Vec3::new(2.0, 1.0, -10.0).transform(&ortho);
        assert_abs_diff_eq!(far, Vec3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_shadow_projects_onto_plane() {
        let ground = Plane::new(Vec3::Y, 0.0);
        let light = Vec3::new(1.0, -1.0, 0.0);
        let m = Mat4::shadow(light, &ground);

        let p = Vec4::new(0.0, 2.0, 0.0, 1.0).transform(&m);
        let projected = p.truncate() / p.w;
        assert_abs_diff_eq!(projected, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_reflection() {
        let m = Mat4::reflection(&Plane::new(Vec3::Y, -2.0));
        assert_abs_diff_eq!(
            Vec3::new(1.0, 3.0, 1.0).transform(&m),
            Vec3::new(1.0, 1.0, 1.0),
            epsilon = EPSILON
        );

        // Unnormalized planes are normalized first.
        let scaled = Mat4::reflection(&Plane::new(Vec3::new(0.0, 2.0, 0.0), -4.0));
        assert_abs_diff_eq!(scaled, m, epsilon = EPSILON);
        assert_abs_diff_eq!(m * m, Mat4::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_billboard_faces_camera() {
        let camera = Vec3::new(3.0, 4.0, 5.0);
        let object = camera + Vec3::new(0.0, 0.0, -10.0);
        let m = Mat4::billboard(object, camera, Vec3::Y, -Vec3::Z);
        let expected = Mat4::from_rotation_y(PI) * Mat4::from_translation(object);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_billboard_coincident_positions_use_camera_forward() {
        let p = Vec3::new(3.0, 4.0, 5.0);
        let facing_away = Mat4::billboard(p, p, Vec3::Y, -Vec3::Z);
        assert_abs_diff_eq!(facing_away, Mat4::from_translation(p), epsilon = EPSILON);

        let facing_back = Mat4::billboard(p, p, Vec3::Y, Vec3::Z);
        let expected = Mat4::from_rotation_y(PI) * Mat4::from_translation(p);
        assert_abs_diff_eq!(facing_back, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_constrained_billboard() {
        let camera = Vec3::new(3.0, 4.0, 5.0);
        let object = camera + Vec3::new(0.0, 0.0, -10.0);
        let expected = Mat4::from_rotation_y(PI) * Mat4::from_translation(object);

        let m = Mat4::constrained_billboard(object, camera, Vec3::Y, -Vec3::Z, -Vec3::Z);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);

        // Camera directly above: fall back to the object forward.
        let above = object + Vec3::new(0.0, 10.0, 0.0);
        let m = Mat4::constrained_billboard(object, above, Vec3::Y, -Vec3::Z, -Vec3::Z);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);

        // Object forward parallel to the axis too: fall back to -Z.
        let m = Mat4::constrained_billboard(object, above, Vec3::Y, -Vec3::Z, Vec3::Y);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_constrained_billboard_z_axis_default() {
        let object = Vec3::ZERO;
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let m = Mat4::constrained_billboard(object, camera, Vec3::Z, -Vec3::Z, Vec3::Z);
        assert!(m.to_array().iter().all(|v| v.is_finite()));
        assert_eq!(m.row(1), Vec4::Z);
        assert_abs_diff_eq!(m.row(2), Vec4::X, epsilon = EPSILON);
    }
}
