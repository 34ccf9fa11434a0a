// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Resolving a viewBox/viewport pair into an affine mapping.

use crate::geom::Transform;
use crate::viewbox::{Align, AspectRatio, MeetOrSlice, ViewBox};
use crate::{FuzzyEq, IsValidLength};

/// A target rendering surface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    /// Width in target units.
    pub width: f64,
    /// Height in target units.
    pub height: f64,
}

impl Viewport {
    /// Creates a new `Viewport`.
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// Returns width/height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Checks that the viewport has a positive, finite size.
    pub fn is_valid(&self) -> bool {
        self.width.is_valid_length() && self.height.is_valid_length()
    }

    /// Resolves the mapping from `view_box` user space into this viewport.
    ///
    /// Implements the [`preserveAspectRatio`] fitting rules:
    ///
    /// - `Align::None` scales both axes independently (stretch).
    /// - Otherwise a uniform scale is used: the smaller axis ratio for
    ///   `meet` (letterbox), the larger for `slice` (crop), with leftover
    ///   space distributed by the alignment factors.
    ///
    /// A degenerate viewBox or viewport yields the identity mapping
    /// instead of propagating NaN/Inf.
    ///
    /// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
    pub fn mapping(&self, view_box: ViewBox, aspect: AspectRatio) -> ViewportMapping {
        if !(view_box.w.is_valid_length() && view_box.h.is_valid_length()) || !self.is_valid() {
            log::warn!(
                "Degenerate viewBox or viewport. Fallback to the identity mapping."
            );
            return ViewportMapping::identity(*self);
        }

        let sx = self.width / view_box.w;
        let sy = self.height / view_box.h;

        let (sx, sy) = if aspect.align == Align::None {
            (sx, sy)
        } else {
            let s = match aspect.meet_or_slice {
                MeetOrSlice::Meet => if sx > sy { sy } else { sx },
                MeetOrSlice::Slice => if sx < sy { sy } else { sx },
            };

            (s, s)
        };

        let content_width = view_box.w * sx;
        let content_height = view_box.h * sy;

        let leftover_x = self.width - content_width;
        let leftover_y = self.height - content_height;

        let (fx, fy) = aspect.align.factors();
        let translate_x = leftover_x * fx - view_box.x * sx;
        let translate_y = leftover_y * fy - view_box.y * sy;

        let clip_needed = (content_width > self.width
            && content_width.fuzzy_ne(&self.width))
            || (content_height > self.height
                && content_height.fuzzy_ne(&self.height));

        ViewportMapping {
            scale_x: sx,
            scale_y: sy,
            translate_x,
            translate_y,
            viewport_width: self.width,
            viewport_height: self.height,
            content_width,
            content_height,
            clip_needed,
        }
    }
}

impl From<(f64, f64)> for Viewport {
    fn from(v: (f64, f64)) -> Self {
        Viewport::new(v.0, v.1)
    }
}

/// A resolved viewBox-to-viewport affine mapping.
///
/// Computed fresh per (viewBox, viewport, alignment) tuple and never
/// mutated afterwards, so it is safe to cache and share.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ViewportMapping {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// ViewBox width after scaling.
    pub content_width: f64,
    /// ViewBox height after scaling.
    pub content_height: f64,
    /// `true` when content overflows the viewport and must be clipped,
    /// i.e. on `slice` overflow.
    pub clip_needed: bool,
}

impl ViewportMapping {
    /// Creates an identity-like mapping for the provided viewport.
    pub fn identity(viewport: Viewport) -> Self {
        ViewportMapping {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            content_width: viewport.width,
            content_height: viewport.height,
            clip_needed: false,
        }
    }

    /// Applies the mapping to a point in viewBox user space.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale_x + self.translate_x,
            y * self.scale_y + self.translate_y,
        )
    }

    /// Converts the mapping to a `Transform`.
    pub fn to_transform(&self) -> Transform {
        Transform::new(
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        )
    }

    /// Resolves a nested `<svg>` viewport declared inside this mapping's
    /// user space.
    ///
    /// `x`/`y`/`width`/`height` are the inner element's attributes in the
    /// outer user space. They are mapped through `self` first, then the
    /// inner viewBox is fitted into the result. The returned mapping takes
    /// a point in the innermost viewBox space straight to the root space,
    /// i.e. inner-then-outer composition is already applied.
    pub fn nested(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        view_box: ViewBox,
        aspect: AspectRatio,
    ) -> ViewportMapping {
        let (vx, vy) = self.apply(x, y);
        let inner = Viewport::new(width * self.scale_x, height * self.scale_y);

        let mut mapping = inner.mapping(view_box, aspect);
        mapping.translate_x += vx;
        mapping.translate_y += vy;
        mapping
    }
}

/// Resolves a batch of viewBox/viewport pairs with a shared alignment.
///
/// Order-preserving and element-wise identical to [`Viewport::mapping`];
/// there is no cross-element interaction.
pub fn resolve_batch(
    pairs: &[(ViewBox, Viewport)],
    aspect: AspectRatio,
) -> Vec<ViewportMapping> {
    pairs
        .iter()
        .map(|&(view_box, viewport)| viewport.mapping(view_box, aspect))
        .collect()
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzyEq;

    fn aspect(text: &str) -> AspectRatio {
        AspectRatio::parse_or_default(text)
    }

    #[test]
    fn perfect_match() {
        // Same 4:3 aspect: pure scale, no leftover.
        let vb = ViewBox::new(0.0, 0.0, 100.0, 75.0);
        let m = Viewport::new(800.0, 600.0).mapping(vb, aspect("xMidYMid meet"));
        assert_eq!(m.scale_x, 8.0);
        assert_eq!(m.scale_y, 8.0);
        assert_eq!(m.translate_x, 0.0);
        assert_eq!(m.translate_y, 0.0);
        assert!(!m.clip_needed);
    }

    #[test]
    fn meet_vs_slice() {
        // 2:1 viewBox into a 2:3 viewport.
        let vb = ViewBox::new(0.0, 0.0, 200.0, 100.0);
        let vp = Viewport::new(400.0, 600.0);

        let meet = vp.mapping(vb, aspect("xMidYMid meet"));
        assert_eq!(meet.scale_x, 2.0);
        assert_eq!(meet.content_height, 200.0);
        assert!(!meet.clip_needed);

        let slice = vp.mapping(vb, aspect("xMidYMid slice"));
        assert_eq!(slice.scale_x, 6.0);
        assert_eq!(slice.content_width, 1200.0);
        assert!(slice.clip_needed);
    }

    #[test]
    fn alignment_symmetry() {
        // Leftover on the Y axis: 800x600 viewport, 2:1 content.
        let vb = ViewBox::new(0.0, 0.0, 200.0, 100.0);
        let vp = Viewport::new(800.0, 600.0);
        let leftover = 600.0 - 100.0 * 4.0;

        let min = vp.mapping(vb, aspect("xMinYMin meet"));
        let mid = vp.mapping(vb, aspect("xMidYMid meet"));
        let max = vp.mapping(vb, aspect("xMaxYMax meet"));

        assert_eq!(min.translate_y, 0.0);
        assert_eq!(mid.translate_y, leftover / 2.0);
        assert_eq!(max.translate_y, leftover);

        // No leftover on X, so all three agree there.
        assert_eq!(min.translate_x, 0.0);
        assert_eq!(mid.translate_x, 0.0);
        assert_eq!(max.translate_x, 0.0);
    }

    #[test]
    fn stretch() {
        let vb = ViewBox::new(10.0, 20.0, 100.0, 100.0);
        let m = Viewport::new(800.0, 600.0).mapping(vb, aspect("none"));
        assert_eq!(m.scale_x, 8.0);
        assert_eq!(m.scale_y, 6.0);
        assert_eq!(m.translate_x, -10.0 * 8.0);
        assert_eq!(m.translate_y, -20.0 * 6.0);
        assert!(!m.clip_needed);
    }

    #[test]
    fn offset_viewbox_corners() {
        // All four viewBox corners must land on the mapped region corners.
        let vb = ViewBox::new(-20.0, 30.0, 100.0, 75.0);
        let vp = Viewport::new(800.0, 600.0);
        let m = vp.mapping(vb, aspect("xMidYMid meet"));

        let (x0, y0) = m.apply(vb.x, vb.y);
        let (x1, y1) = m.apply(vb.x + vb.w, vb.y + vb.h);
        assert!(x0.fuzzy_eq(&0.0) && y0.fuzzy_eq(&0.0));
        assert!(x1.fuzzy_eq(&800.0) && y1.fuzzy_eq(&600.0));
    }

    #[test]
    fn degenerate_viewbox() {
        let vb = ViewBox::new(0.0, 0.0, 0.0, 100.0);
        let m = Viewport::new(800.0, 600.0).mapping(vb, aspect(""));
        assert_eq!(m, ViewportMapping::identity(Viewport::new(800.0, 600.0)));
    }

    #[test]
    fn degenerate_viewport() {
        let vb = ViewBox::new(0.0, 0.0, 100.0, 100.0);
        let m = Viewport::new(0.0, 600.0).mapping(vb, aspect(""));
        assert_eq!(m.scale_x, 1.0);
        assert_eq!(m.translate_x, 0.0);
    }

    #[test]
    fn to_transform_matches_apply() {
        let vb = ViewBox::new(5.0, -5.0, 50.0, 100.0);
        let m = Viewport::new(400.0, 600.0).mapping(vb, aspect("xMaxYMin slice"));
        let ts = m.to_transform();
        assert_eq!(ts.apply(13.0, 17.0), m.apply(13.0, 17.0));
    }

    #[test]
    fn nested_composition() {
        // Outer: 0 0 100 100 into 800x600, stretched.
        let outer_vb = ViewBox::new(0.0, 0.0, 100.0, 100.0);
        let outer = Viewport::new(800.0, 600.0).mapping(outer_vb, aspect("none"));

        // Inner <svg x=10 y=10 width=50 height=50 viewBox="0 0 25 25">.
        let inner_vb = ViewBox::new(0.0, 0.0, 25.0, 25.0);
        let inner = outer.nested(10.0, 10.0, 50.0, 50.0, inner_vb, aspect("none"));

        // Inner viewBox origin lands where (10, 10) lands in the outer space.
        assert_eq!(inner.apply(0.0, 0.0), outer.apply(10.0, 10.0));
        // Inner viewBox far corner lands where (60, 60) lands.
        let (x, y) = inner.apply(25.0, 25.0);
        let (ex, ey) = outer.apply(60.0, 60.0);
        assert!(x.fuzzy_eq(&ex) && y.fuzzy_eq(&ey));
    }

    #[test]
    fn batch_equals_scalar() {
        let pairs = [
            (ViewBox::new(0.0, 0.0, 100.0, 75.0), Viewport::new(800.0, 600.0)),
            (ViewBox::new(0.0, 0.0, 200.0, 100.0), Viewport::new(400.0, 600.0)),
            (ViewBox::new(0.0, 0.0, 0.0, 1.0), Viewport::new(10.0, 10.0)),
        ];

        let batch = resolve_batch(&pairs, AspectRatio::default());
        assert_eq!(batch.len(), 3);
        for (i, &(vb, vp)) in pairs.iter().enumerate() {
            assert_eq!(batch[i], vp.mapping(vb, AspectRatio::default()));
        }
    }
}
