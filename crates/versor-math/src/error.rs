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

//! Error types for the argument-validating matrix builders.

use thiserror::Error;

/// An invalid argument passed to one of the perspective projection builders.
///
/// Orthographic projections never produce this error; they accept any
/// near/far combination and let the resulting matrix carry whatever values
/// the arithmetic yields.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    /// The vertical field of view was not inside the open interval `(0, PI)`.
    #[error("field of view must lie strictly between 0 and PI radians, got {field_of_view}")]
    FieldOfViewOutOfRange {
        /// The rejected field of view, in radians.
        field_of_view: f32,
    },
    /// The near plane distance was zero or negative.
    #[error("near plane distance must be positive, got {near}")]
    NonPositiveNearPlane {
        /// The rejected near plane distance.
        near: f32,
    },
    /// The far plane distance was zero or negative.
    #[error("far plane distance must be positive, got {far}")]
    NonPositiveFarPlane {
        /// The rejected far plane distance.
        far: f32,
    },
    /// The near plane was not strictly closer than the far plane.
    #[error("near plane distance ({near}) must be less than far plane distance ({far})")]
    NearPlaneNotBeforeFar {
        /// The near plane distance.
        near: f32,
        /// The far plane distance.
        far: f32,
    },
}

/// Validates the near/far pair shared by every perspective builder.
pub(crate) fn check_depth_range(near: f32, far: f32) -> Result<(), ProjectionError> {
    if !(near > 0.0) {
        return Err(ProjectionError::NonPositiveNearPlane { near });
    }
    if !(far > 0.0) {
        return Err(ProjectionError::NonPositiveFarPlane { far });
    }
    if near >= far {
        return Err(ProjectionError::NearPlaneNotBeforeFar { near, far });
    }
    Ok(())
}
