// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all structural errors.
///
/// Unlike malformed attribute strings, which degrade to documented fallback
/// values, these indicate input the coordinate pipeline cannot produce
/// meaningful geometry for. The caller decides whether to skip the element
/// or abort the conversion.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Error {
    /// A path with no commands at all.
    EmptyPath,

    /// A path whose commands contribute no coordinates,
    /// e.g. a pure ClosePath sequence.
    NoPathPoints,

    /// Transform composition produced a non-finite coordinate.
    ///
    /// Carries the original user-space point that failed.
    NonFiniteCoordinate {
        /// X coordinate in user space.
        x: f64,
        /// Y coordinate in user space.
        y: f64,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::EmptyPath => {
                write!(f, "path has no commands")
            }
            Error::NoPathPoints => {
                write!(f, "path commands contribute no points")
            }
            Error::NonFiniteCoordinate { x, y } => {
                write!(f, "coordinate transform of ({} {}) is not finite", x, y)
            }
        }
    }
}

impl std::error::Error for Error {}
