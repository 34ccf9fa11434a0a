// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Transforming user-space coordinates into EMU and PowerPoint's
//! bounds-relative space.

use crate::error::Error;
use crate::units::{ConversionContext, EMU_PER_INCH};
use crate::viewport::ViewportMapping;
use crate::f64_bound;

/// Extent of PowerPoint's bounds-relative path coordinate space.
///
/// Matches `<a:path w="100000" h="100000">`.
pub const RELATIVE_EXTENT: f64 = 100_000.0;

/// List of all path command verbs.
///
/// Mirrors the SVG path grammar. Upper/lowercase command letters are
/// represented by [`PathCommand::relative`], not by separate verbs.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PathVerb {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    QuadTo,
    SmoothQuadTo,
    EllipticalArc,
    ClosePath,
}

impl PathVerb {
    /// Number of parameters one repetition of the verb consumes.
    pub fn arity(self) -> usize {
        match self {
            PathVerb::MoveTo => 2,
            PathVerb::LineTo => 2,
            PathVerb::HorizontalLineTo => 1,
            PathVerb::VerticalLineTo => 1,
            PathVerb::CurveTo => 6,
            PathVerb::SmoothCurveTo => 4,
            PathVerb::QuadTo => 4,
            PathVerb::SmoothQuadTo => 2,
            PathVerb::EllipticalArc => 7,
            PathVerb::ClosePath => 0,
        }
    }
}

/// A single, already tokenized path command.
///
/// Produced by an external path-data parser; this crate only consumes
/// structured commands.
#[derive(Clone, PartialEq, Debug)]
pub struct PathCommand {
    /// The command verb.
    pub verb: PathVerb,
    /// Raw numeric parameters. SVG allows repeated parameter groups,
    /// so the list may hold several multiples of the verb's arity.
    pub params: Vec<f64>,
    /// `true` for lowercase (relative) command letters.
    pub relative: bool,
}

impl PathCommand {
    /// Creates a new command.
    pub fn new(verb: PathVerb, params: Vec<f64>, relative: bool) -> Self {
        PathCommand {
            verb,
            params,
            relative,
        }
    }

    /// Creates an absolute MoveTo.
    pub fn move_to(x: f64, y: f64) -> Self {
        PathCommand::new(PathVerb::MoveTo, vec![x, y], false)
    }

    /// Creates an absolute LineTo.
    pub fn line_to(x: f64, y: f64) -> Self {
        PathCommand::new(PathVerb::LineTo, vec![x, y], false)
    }

    /// Creates a ClosePath.
    pub fn close() -> Self {
        PathCommand::new(PathVerb::ClosePath, Vec::new(), false)
    }
}

/// Coordinate space a value was computed in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoordSpace {
    /// SVG user space, i.e. pre-transform pixels.
    UserSpace,
    /// English Metric Units.
    Emu,
}

/// An axis-aligned bounding box of a path.
///
/// Recomputed from scratch whenever the source path changes;
/// there is no incremental update.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathBounds {
    /// Left edge.
    pub min_x: i64,
    /// Top edge.
    pub min_y: i64,
    /// Right edge.
    pub max_x: i64,
    /// Bottom edge.
    pub max_y: i64,
    /// Space the bounds were computed in.
    pub space: CoordSpace,
}

impl PathBounds {
    /// Returns the bounds width.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    /// Returns the bounds height.
    #[inline]
    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }
}

/// The single entry point mapping raw SVG coordinates to slide space.
///
/// Stateless per call: construction captures the ambient context and an
/// optional viewport mapping, after which every method is a pure function
/// of its inputs. Safe to share across threads.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateSystem {
    ctx: ConversionContext,
    mapping: Option<ViewportMapping>,
}

impl CoordinateSystem {
    /// Creates a coordinate system without a viewport mapping.
    ///
    /// Used for documents without a `viewBox`: user-space coordinates
    /// pass through unchanged before unit conversion.
    pub fn new(ctx: ConversionContext) -> Self {
        CoordinateSystem { ctx, mapping: None }
    }

    /// Creates a coordinate system with a resolved viewport mapping.
    pub fn with_mapping(ctx: ConversionContext, mapping: ViewportMapping) -> Self {
        CoordinateSystem {
            ctx,
            mapping: Some(mapping),
        }
    }

    /// Returns the viewport mapping, if any.
    pub fn mapping(&self) -> Option<&ViewportMapping> {
        self.mapping.as_ref()
    }

    /// Applies the viewport transform to a user-space point.
    ///
    /// Identity when no mapping is set.
    #[inline]
    pub fn apply_viewport_transform(&self, x: f64, y: f64) -> (f64, f64) {
        match self.mapping {
            Some(ref m) => m.apply(x, y),
            None => (x, y),
        }
    }

    #[inline]
    fn px_to_emu(&self, v: f64) -> f64 {
        v * EMU_PER_INCH / self.ctx.dpi
    }

    /// Maps a user-space point to EMU.
    ///
    /// Fails when transform composition produces a non-finite value,
    /// carrying the original input for the caller's error report.
    pub fn point_to_emu(&self, x: f64, y: f64) -> Result<(f64, f64), Error> {
        let (tx, ty) = self.apply_viewport_transform(x, y);
        let ex = self.px_to_emu(tx);
        let ey = self.px_to_emu(ty);

        if !(ex.is_finite() && ey.is_finite()) {
            return Err(Error::NonFiniteCoordinate { x, y });
        }

        Ok((ex, ey))
    }

    /// Maps a user-space point into PowerPoint's bounds-relative
    /// 0..100000 space.
    ///
    /// The point goes through the viewport transform and EMU conversion,
    /// then is renormalized against `bounds`. Output is always within
    /// `[0, 100000]`: out-of-bounds coordinates are clamped, never
    /// wrapped. A zero-extent axis yields 0 instead of dividing by zero.
    ///
    /// A non-finite point is a structural failure, not a clamping case:
    /// it surfaces as [`Error::NonFiniteCoordinate`] rather than being
    /// substituted by a value that could corrupt the shape.
    pub fn svg_to_relative(
        &self,
        x: f64,
        y: f64,
        bounds: &PathBounds,
    ) -> Result<(i64, i64), Error> {
        let (ex, ey) = self.point_to_emu(x, y)?;

        let rx = relative_coord(ex, bounds.min_x, bounds.width());
        let ry = relative_coord(ey, bounds.min_y, bounds.height());
        Ok((rx, ry))
    }

    /// Calculates the EMU bounding box of a path.
    ///
    /// Walks the command sequence tracking the pen position from (0, 0).
    /// Every command contributes the points it carries: endpoints for
    /// lines, all control and end points for the curve families, and only
    /// the endpoint for arcs. Relative commands are offset by the pen
    /// position first.
    ///
    /// Curve bounds are therefore the control polygon's bounds (slightly
    /// loose) and arc bounds ignore the swept extrema (possibly tight);
    /// both are deliberate approximations.
    pub fn calculate_path_bounds(&self, commands: &[PathCommand]) -> Result<PathBounds, Error> {
        if commands.is_empty() {
            return Err(Error::EmptyPath);
        }

        let mut minx = f64::MAX;
        let mut miny = f64::MAX;
        let mut maxx = f64::MIN;
        let mut maxy = f64::MIN;
        let mut has_points = false;

        // Pen position and subpath start, in user space.
        let mut px = 0.0;
        let mut py = 0.0;
        let mut sx = 0.0;
        let mut sy = 0.0;

        for command in commands {
            let arity = command.verb.arity();

            if arity == 0 {
                debug_assert_eq!(command.verb, PathVerb::ClosePath);
                px = sx;
                py = sy;
                continue;
            }

            let rem = command.params.len() % arity;
            if rem != 0 {
                // Best-effort prefix: complete parameter groups are used,
                // the truncated tail is dropped.
                log::warn!(
                    "Path command {:?} has {} trailing parameter(s). Ignored.",
                    command.verb,
                    rem
                );
            }

            let mut first_group = true;
            for group in command.params.chunks_exact(arity) {
                let mut points = [(0.0, 0.0); 3];
                let points = extract_points(command, group, px, py, &mut points);

                for &(x, y) in points.iter() {
                    let (ex, ey) = self.point_to_emu(x, y)?;
                    minx = minx.min(ex);
                    miny = miny.min(ey);
                    maxx = maxx.max(ex);
                    maxy = maxy.max(ey);
                    has_points = true;
                }

                // The last extracted point is always the new pen position.
                if let Some(&(x, y)) = points.last() {
                    px = x;
                    py = y;

                    if command.verb == PathVerb::MoveTo && first_group {
                        sx = x;
                        sy = y;
                    }
                }

                first_group = false;
            }
        }

        if !has_points {
            return Err(Error::NoPathPoints);
        }

        Ok(PathBounds {
            min_x: minx.round() as i64,
            min_y: miny.round() as i64,
            max_x: maxx.round() as i64,
            max_y: maxy.round() as i64,
            space: CoordSpace::Emu,
        })
    }
}

/// Extracts the user-space points one parameter group contributes.
fn extract_points<'a>(
    command: &PathCommand,
    group: &[f64],
    px: f64,
    py: f64,
    points: &'a mut [(f64, f64); 3],
) -> &'a [(f64, f64)] {
    let (dx, dy) = if command.relative { (px, py) } else { (0.0, 0.0) };

    match command.verb {
        PathVerb::MoveTo | PathVerb::LineTo | PathVerb::SmoothQuadTo => {
            points[0] = (group[0] + dx, group[1] + dy);
            &points[..1]
        }
        PathVerb::HorizontalLineTo => {
            points[0] = (group[0] + dx, py);
            &points[..1]
        }
        PathVerb::VerticalLineTo => {
            points[0] = (px, group[0] + dy);
            &points[..1]
        }
        PathVerb::CurveTo => {
            points[0] = (group[0] + dx, group[1] + dy);
            points[1] = (group[2] + dx, group[3] + dy);
            points[2] = (group[4] + dx, group[5] + dy);
            &points[..3]
        }
        PathVerb::SmoothCurveTo | PathVerb::QuadTo => {
            points[0] = (group[0] + dx, group[1] + dy);
            points[1] = (group[2] + dx, group[3] + dy);
            &points[..2]
        }
        PathVerb::EllipticalArc => {
            // Endpoint only. The swept extrema are deliberately ignored,
            // so arcs that bulge beyond their chord under-report bounds.
            points[0] = (group[5] + dx, group[6] + dy);
            &points[..1]
        }
        PathVerb::ClosePath => &points[..0],
    }
}

fn relative_coord(emu: f64, min: i64, extent: i64) -> i64 {
    if extent == 0 {
        return 0;
    }

    let rel = (emu - min as f64) / extent as f64 * RELATIVE_EXTENT;
    // Fixed 6-digit precision before clamping.
    let rel = (rel * 1e6).round() / 1e6;
    f64_bound(0.0, rel, RELATIVE_EXTENT).round() as i64
}
