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

//! # Versor Math
//!
//! Row-major 3D affine and rotation mathematics: [`Vec3`], [`Quaternion`] and
//! [`Mat4`], plus the [`Plane`] type used by the shadow and reflection builders.
//!
//! Transforms follow the **row-vector convention**: a point is transformed as
//! `v' = v * M`, so chained transforms read left-to-right in the order they are
//! applied. `Mat4::from_scale(s) * Mat4::from_quaternion(q) * Mat4::from_translation(t)`
//! scales first, then rotates, then translates.
//!
//! Degenerate inputs follow IEEE-754: normalizing a zero vector or inverting a
//! zero quaternion yields NaN components instead of panicking. Only the
//! perspective projection builders validate their arguments, returning a
//! [`ProjectionError`].
//!
//! All angular functions operate in **radians** unless explicitly specified
//! otherwise (e.g., `degrees_to_radians`).

#![warn(missing_docs)]

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

// Re-export standard mathematical constants for convenience.
pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

mod approx_impls;
pub mod error;
pub mod matrix;
pub mod outcome;
pub mod plane;
pub mod quaternion;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::error::ProjectionError;
pub use self::matrix::{Decomposition, Mat4};
pub use self::outcome::Outcome;
pub use self::plane::Plane;
pub use self::quaternion::Quaternion;
pub use self::vector::{Vec3, Vec4};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use versor_math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use versor_math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use versor_math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the crate's default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use versor_math::{approx_eq, EPSILON};
/// assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
/// assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
