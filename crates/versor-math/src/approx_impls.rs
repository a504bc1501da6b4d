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

//! Tolerant, field-by-field comparisons through the `approx` traits.
//!
//! `PartialEq` on the value types is exact IEEE equality. These impls provide
//! the tolerance-based counterpart, so `approx::relative_eq!(a, b, epsilon = 1e-5)`
//! works directly on vectors, quaternions, matrices and planes.

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::{Mat4, Plane, Quaternion, Vec3, Vec4};

macro_rules! impl_approx_fields {
    ($ty:ty => $($field:ident).+ $(, $($rest:ident).+)*) => {
        impl AbsDiffEq for $ty {
            type Epsilon = f32;

            #[inline]
            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            #[inline]
            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                self.$($field).+.abs_diff_eq(&other.$($field).+, epsilon)
                    $(&& self.$($rest).+.abs_diff_eq(&other.$($rest).+, epsilon))*
            }
        }

        impl RelativeEq for $ty {
            #[inline]
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            #[inline]
            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                self.$($field).+.relative_eq(&other.$($field).+, epsilon, max_relative)
                    $(&& self.$($rest).+.relative_eq(&other.$($rest).+, epsilon, max_relative))*
            }
        }

        impl UlpsEq for $ty {
            #[inline]
            fn default_max_ulps() -> u32 {
                f32::default_max_ulps()
            }

            #[inline]
            fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
                self.$($field).+.ulps_eq(&other.$($field).+, epsilon, max_ulps)
                    $(&& self.$($rest).+.ulps_eq(&other.$($rest).+, epsilon, max_ulps))*
            }
        }
    };
}

impl_approx_fields!(Vec3 => x, y, z);
impl_approx_fields!(Vec4 => x, y, z, w);
impl_approx_fields!(Quaternion => x, y, z, w);
impl_approx_fields!(Plane => normal.x, normal.y, normal.z, d);
impl_approx_fields!(
    Mat4 => m11, m12, m13, m14, m21, m22, m23, m24, m31, m32, m33, m34, m41, m42, m43, m44
);
