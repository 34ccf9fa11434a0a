// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svg2pptx` is the coordinate core of an SVG to PowerPoint (DrawingML)
converter.

PowerPoint positions everything in EMU (English Metric Units, 914400 per
inch) and describes custom path geometry in a bounds-relative 0..100000
integer space. SVG, on the other hand, authors content in an arbitrary
user space selected by `viewBox` and fitted into a viewport according to
`preserveAspectRatio`. This crate resolves that gap:

- [`Length`] parses dimension strings (`10px`, `2.5cm`, `50%`, ...) and
  converts them to pixels or EMU against a [`ConversionContext`].
- [`ViewBox`] and [`AspectRatio`] parse their SVG attribute counterparts.
- [`Viewport::mapping`] turns a viewBox/viewport pair plus alignment into
  a [`ViewportMapping`] - the affine transform from user space into the
  target surface, including nested `<svg>` composition.
- [`CoordinateSystem`] applies the mapping to raw coordinates, computes
  EMU path bounds and renormalizes points into the 0..100000 range that
  `<a:path w="100000" h="100000">` expects.

The core is pure and stateless per call: no shared mutable state, no I/O.
Batch operations are order-preserving and element-wise identical to their
scalar counterparts, so callers are free to parallelize them.

Malformed input never panics. Attribute-level garbage degrades to
documented fallback values (SVG-in-the-wild is frequently malformed),
while structural failures such as an empty path surface as [`Error`].
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

use float_cmp::ApproxEqUlps;

mod coords;
mod error;
mod geom;
mod stream;
mod units;
mod viewbox;
mod viewport;

pub use crate::coords::*;
pub use crate::error::*;
pub use crate::geom::*;
pub use crate::units::*;
pub use crate::viewbox::*;
pub use crate::viewport::*;

/// Approximate equality comparisons.
pub trait FuzzyEq<Rhs: ?Sized = Self> {
    /// Returns `true` if values are approximately equal.
    fn fuzzy_eq(&self, other: &Rhs) -> bool;

    /// Returns `true` if values are not approximately equal.
    #[inline]
    fn fuzzy_ne(&self, other: &Rhs) -> bool {
        !self.fuzzy_eq(other)
    }
}

/// Approximate zero equality comparisons.
pub trait FuzzyZero: FuzzyEq {
    /// Returns `true` if the value is approximately zero.
    fn is_fuzzy_zero(&self) -> bool;
}

impl FuzzyEq for f64 {
    #[inline]
    fn fuzzy_eq(&self, other: &f64) -> bool {
        self.approx_eq_ulps(other, 4)
    }
}

impl FuzzyZero for f64 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.fuzzy_eq(&0.0)
    }
}

/// Bounds `f64` number.
#[inline]
pub fn f64_bound(min: f64, val: f64, max: f64) -> f64 {
    debug_assert!(min.is_finite());
    debug_assert!(max.is_finite());

    if val > max {
        max
    } else if val < min {
        min
    } else {
        val
    }
}

/// Checks that the current number is > 0.
pub trait IsValidLength {
    /// Checks that the current number is > 0.
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f64 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0 && self.is_finite()
    }
}
