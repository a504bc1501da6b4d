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

//! A tagged result for operations that always produce a value.

/// The result of an operation that reports success alongside a value which is
/// filled in either way.
///
/// Unlike `Option`, a failed `Outcome` still carries a recognizable sentinel:
/// [`Mat4::invert`](crate::Mat4::invert) fills every field with NaN and
/// [`Mat4::decompose`](crate::Mat4::decompose) reports an identity rotation.
/// Callers should branch on [`success`](Self::success) rather than inspect the
/// value for the sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The computed value, or the sentinel when `success` is `false`.
    pub value: T,
}

impl<T> Outcome<T> {
    /// A successful outcome carrying `value`.
    #[inline]
    pub const fn success(value: T) -> Self {
        Self {
            success: true,
            value,
        }
    }

    /// A failed outcome carrying the sentinel `value`.
    #[inline]
    pub const fn failure(value: T) -> Self {
        Self {
            success: false,
            value,
        }
    }

    /// Returns `true` if the operation succeeded.
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Discards the sentinel and converts into an `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.success.then_some(self.value)
    }

    /// Maps the carried value, keeping the success flag.
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            success: self.success,
            value: f(self.value),
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_option()
    }
}
