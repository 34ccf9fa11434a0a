// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SVG length parsing and px/EMU conversion.

use crate::stream::Stream;

/// Number of EMU (English Metric Units) per inch.
///
/// A fixed OOXML constant.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// List of all supported length units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum Unit {
    None,
    Px,
    Pt,
    Mm,
    Cm,
    In,
    Em,
    Ex,
    Percent,
    Vw,
    Vh,
}

/// A conversion axis.
///
/// Percentages and viewport units are direction-dependent,
/// so the axis must be explicit at every call site.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Y,
}

/// Ambient parameters for resolving relative units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ConversionContext {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// Current font size in pixels.
    pub font_size: f64,
    /// Target DPI.
    pub dpi: f64,
    /// Parent element width. Resolves to the viewport width when not set.
    pub parent_width: Option<f64>,
    /// Parent element height. Resolves to the viewport height when not set.
    pub parent_height: Option<f64>,
}

impl Default for ConversionContext {
    fn default() -> Self {
        ConversionContext {
            width: 800.0,
            height: 600.0,
            font_size: 16.0,
            dpi: 96.0,
            parent_width: None,
            parent_height: None,
        }
    }
}

impl ConversionContext {
    /// Creates a context with the provided viewport size.
    pub fn new(width: f64, height: f64) -> Self {
        ConversionContext {
            width,
            height,
            ..ConversionContext::default()
        }
    }

    /// Returns a copy with explicit parent dimensions.
    pub fn with_parent(mut self, width: f64, height: f64) -> Self {
        self.parent_width = Some(width);
        self.parent_height = Some(height);
        self
    }

    /// Returns the effective parent width.
    #[inline]
    pub fn parent_width(&self) -> f64 {
        self.parent_width.unwrap_or(self.width)
    }

    /// Returns the effective parent height.
    #[inline]
    pub fn parent_height(&self) -> f64 {
        self.parent_height.unwrap_or(self.height)
    }
}

/// A length parsing error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LengthError;

impl std::fmt::Display for LengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "string does not start with a number")
    }
}

impl std::error::Error for LengthError {}

/// Representation of the [`<length>`] type.
///
/// [`<length>`]: https://www.w3.org/TR/SVG2/types.html#InterfaceSVGLength
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Length {
    pub number: f64,
    pub unit: Unit,
}

impl Length {
    /// Constructs a new length.
    #[inline]
    pub fn new(number: f64, unit: Unit) -> Length {
        Length { number, unit }
    }

    /// Constructs a new length with `Unit::None`.
    #[inline]
    pub fn new_number(number: f64) -> Length {
        Length {
            number,
            unit: Unit::None,
        }
    }

    /// Constructs a new length with a zero number.
    #[inline]
    pub fn zero() -> Length {
        Length {
            number: 0.0,
            unit: Unit::None,
        }
    }

    /// Parses a length, coercing malformed input to zero.
    ///
    /// This is the single silent-fallback point for dimension attributes:
    /// a document-level attribute with garbage in it must not abort the
    /// whole conversion, so it degrades to `0` with a warning.
    pub fn parse_or_zero(text: &str) -> Length {
        match text.parse() {
            Ok(l) => l,
            Err(_) => {
                log::warn!("Invalid length value: '{}'. Fallback to 0.", text);
                Length::zero()
            }
        }
    }

    /// Converts the length to pixels.
    pub fn to_px(&self, ctx: &ConversionContext, axis: Axis) -> f64 {
        let n = self.number;
        match self.unit {
            Unit::None | Unit::Px => n,
            Unit::Em => n * ctx.font_size,
            // An approximation: real x-height is font-specific.
            Unit::Ex => n * ctx.font_size / 2.0,
            Unit::In => n * ctx.dpi,
            Unit::Cm => n * ctx.dpi / 2.54,
            Unit::Mm => n * ctx.dpi / 25.4,
            Unit::Pt => n * ctx.dpi / 72.0,
            Unit::Percent => match axis {
                Axis::X => n * ctx.parent_width() / 100.0,
                Axis::Y => n * ctx.parent_height() / 100.0,
            },
            Unit::Vw => n * ctx.width / 100.0,
            Unit::Vh => n * ctx.height / 100.0,
        }
    }

    /// Converts the length to EMU, rounded to the nearest integer.
    pub fn to_emu(&self, ctx: &ConversionContext, axis: Axis) -> i64 {
        (self.to_px(ctx, axis) * EMU_PER_INCH / ctx.dpi).round() as i64
    }
}

impl Default for Length {
    #[inline]
    fn default() -> Self {
        Length::zero()
    }
}

impl From<f64> for Length {
    /// Already-numeric input is treated as unitless.
    fn from(n: f64) -> Self {
        Length::new_number(n)
    }
}

impl std::str::FromStr for Length {
    type Err = LengthError;

    #[inline]
    fn from_str(text: &str) -> Result<Self, LengthError> {
        let mut s = Stream::from(text);
        s.parse_length()
    }
}

impl<'a> Stream<'a> {
    /// Parses length from the stream.
    ///
    /// Unlike the SVG grammar, an unrecognized suffix is not an error:
    /// the number is kept and treated as unitless. Only a non-numeric
    /// prefix fails.
    pub(crate) fn parse_length(&mut self) -> Result<Length, LengthError> {
        self.skip_spaces();

        let n = self.parse_number().map_err(|_| LengthError)?;

        let u = if self.starts_with(b"%") {
            Unit::Percent
        } else if self.starts_with(b"em") {
            Unit::Em
        } else if self.starts_with(b"ex") {
            Unit::Ex
        } else if self.starts_with(b"px") {
            Unit::Px
        } else if self.starts_with(b"in") {
            Unit::In
        } else if self.starts_with(b"cm") {
            Unit::Cm
        } else if self.starts_with(b"mm") {
            Unit::Mm
        } else if self.starts_with(b"pt") {
            Unit::Pt
        } else if self.starts_with(b"vw") {
            Unit::Vw
        } else if self.starts_with(b"vh") {
            Unit::Vh
        } else {
            Unit::None
        };

        match u {
            Unit::Percent => self.advance(1),
            Unit::None => {}
            _ => self.advance(2),
        }

        Ok(Length::new(n, u))
    }

    fn parse_list_length(&mut self) -> Result<Length, LengthError> {
        let l = self.parse_length()?;
        self.skip_spaces();
        self.parse_list_separator();
        Ok(l)
    }
}

/// A pull-based list-of-lengths parser.
///
/// Yields one `Length` per list item; stops at the first malformed item.
#[derive(Clone, Copy, Debug)]
pub struct LengthListParser<'a>(Stream<'a>);

impl<'a> From<&'a str> for LengthListParser<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        LengthListParser(Stream::from(v))
    }
}

impl<'a> Iterator for LengthListParser<'a> {
    type Item = Result<Length, LengthError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_spaces();
        if self.0.at_end() {
            None
        } else {
            Some(self.0.parse_list_length())
        }
    }
}

/// Converts a whitespace/comma separated list of lengths to pixels.
///
/// Malformed items terminate the list; already-parsed items are kept.
pub fn convert_list(text: &str, ctx: &ConversionContext, axis: Axis) -> Vec<f64> {
    let mut num_list = Vec::new();
    for length in LengthListParser::from(text) {
        match length {
            Ok(length) => num_list.push(length.to_px(ctx, axis)),
            Err(_) => break,
        }
    }

    num_list
}

/// Converts a batch of dimension strings to EMU.
///
/// Element-wise identical to `Length::parse_or_zero` + `Length::to_emu`:
/// batching never changes individual results.
pub fn convert_batch(values: &[&str], ctx: &ConversionContext, axis: Axis) -> Vec<i64> {
    values
        .iter()
        .map(|v| Length::parse_or_zero(v).to_emu(ctx, axis))
        .collect()
}

/// Resolves a `font-size` value against the current font size.
///
/// Malformed input returns the *current* font size, not zero. This mirrors
/// CSS inheritance: a broken `font-size` keeps the parent value, while a
/// broken geometry attribute collapses to nothing.
pub fn resolve_font_size(text: &str, ctx: &ConversionContext) -> f64 {
    let length: Result<Length, _> = text.parse();
    let length = match length {
        Ok(l) => l,
        Err(_) => return convert_named_font_size(text.trim(), ctx.font_size),
    };

    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * ctx.font_size,
        Unit::Ex => n * ctx.font_size / 2.0,
        Unit::In => n * ctx.dpi,
        Unit::Cm => n * ctx.dpi / 2.54,
        Unit::Mm => n * ctx.dpi / 25.4,
        Unit::Pt => n * ctx.dpi / 72.0,
        // `font-size` percentages are relative to the parent font size.
        Unit::Percent => n * ctx.font_size / 100.0,
        // Viewport units have no meaning for font sizes here. Inherit.
        Unit::Vw | Unit::Vh => ctx.font_size,
    }
}

fn convert_named_font_size(name: &str, parent_font_size: f64) -> f64 {
    let factor = match name {
        "xx-small" => -3,
        "x-small" => -2,
        "small" => -1,
        "medium" => 0,
        "large" => 1,
        "x-large" => 2,
        "xx-large" => 3,
        "smaller" => -1,
        "larger" => 1,
        _ => {
            log::warn!("Invalid 'font-size' value: '{}'. Fallback to inherited.", name);
            return parent_font_size;
        }
    };

    // 'On a computer screen a scaling factor of 1.2 is suggested
    // between adjacent indexes.'
    parent_font_size * 1.2f64.powi(factor)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Length::parse_or_zero($text), $result);
            }
        )
    }

    test_parse!(parse_1,  "1",     Length::new(1.0, Unit::None));
    test_parse!(parse_2,  "1em",   Length::new(1.0, Unit::Em));
    test_parse!(parse_3,  "1ex",   Length::new(1.0, Unit::Ex));
    test_parse!(parse_4,  "1px",   Length::new(1.0, Unit::Px));
    test_parse!(parse_5,  "1in",   Length::new(1.0, Unit::In));
    test_parse!(parse_6,  "1cm",   Length::new(1.0, Unit::Cm));
    test_parse!(parse_7,  "1mm",   Length::new(1.0, Unit::Mm));
    test_parse!(parse_8,  "1pt",   Length::new(1.0, Unit::Pt));
    test_parse!(parse_9,  "1%",    Length::new(1.0, Unit::Percent));
    test_parse!(parse_10, "1vw",   Length::new(1.0, Unit::Vw));
    test_parse!(parse_11, "1vh",   Length::new(1.0, Unit::Vh));
    test_parse!(parse_12, "1e0em", Length::new(1.0, Unit::Em));
    test_parse!(parse_13, "-2.5",  Length::new(-2.5, Unit::None));
    // Unknown suffix is kept as unitless, not an error.
    test_parse!(parse_14, "10q",   Length::new(10.0, Unit::None));
    // Silent-zero fallback for a non-numeric prefix.
    test_parse!(parse_15, "abc",   Length::zero());
    test_parse!(parse_16, "",      Length::zero());

    #[test]
    fn strict_parse_err() {
        assert_eq!("abc".parse::<Length>().unwrap_err(), LengthError);
    }

    macro_rules! test_px {
        ($name:ident, $text:expr, $axis:expr, $result:expr) => (
            #[test]
            fn $name() {
                let ctx = ConversionContext::default();
                assert_eq!(Length::parse_or_zero($text).to_px(&ctx, $axis), $result);
            }
        )
    }

    // Defaults: 800x600 viewport, font-size 16, dpi 96.
    test_px!(px_1, "1in",  Axis::X, 96.0);
    test_px!(px_2, "72pt", Axis::X, 96.0);
    test_px!(px_3, "2.54cm", Axis::X, 96.0);
    test_px!(px_4, "25.4mm", Axis::X, 96.0);
    test_px!(px_5, "2em",  Axis::X, 32.0);
    test_px!(px_6, "2ex",  Axis::X, 16.0);
    test_px!(px_7, "50%",  Axis::X, 400.0);
    test_px!(px_8, "50%",  Axis::Y, 300.0);
    test_px!(px_9, "10vw", Axis::X, 80.0);
    test_px!(px_10, "10vh", Axis::X, 60.0);
    test_px!(px_11, "42",  Axis::X, 42.0);
    test_px!(px_12, "42px", Axis::Y, 42.0);

    #[test]
    fn px_linearity() {
        let ctx = ConversionContext::default();
        for n in 1..10 {
            let text = format!("{}pt", n);
            let px = Length::parse_or_zero(&text).to_px(&ctx, Axis::X);
            assert_eq!(px, n as f64 * ctx.dpi / 72.0);
        }
    }

    #[test]
    fn percent_of_parent() {
        let ctx = ConversionContext::default().with_parent(200.0, 100.0);
        assert_eq!(Length::parse_or_zero("50%").to_px(&ctx, Axis::X), 100.0);
        assert_eq!(Length::parse_or_zero("50%").to_px(&ctx, Axis::Y), 50.0);
        // Viewport units still use the viewport, not the parent.
        assert_eq!(Length::parse_or_zero("50vw").to_px(&ctx, Axis::X), 400.0);
    }

    #[test]
    fn emu_invariant() {
        let ctx = ConversionContext::default();
        for text in &["1in", "10px", "2.5cm", "100pt", "3em"] {
            let l = Length::parse_or_zero(text);
            let px = l.to_px(&ctx, Axis::X);
            assert_eq!(l.to_emu(&ctx, Axis::X),
                       (px * EMU_PER_INCH / ctx.dpi).round() as i64);
        }

        // 1in is exactly 914400 EMU regardless of DPI.
        let mut ctx = ConversionContext::default();
        ctx.dpi = 300.0;
        assert_eq!(Length::parse_or_zero("1in").to_emu(&ctx, Axis::X), 914_400);
    }

    #[test]
    fn batch_equals_scalar() {
        let ctx = ConversionContext::default();
        let values = ["10px", "1in", "garbage", "50%", "", "2em"];
        let batch = convert_batch(&values, &ctx, Axis::X);
        let scalar: Vec<i64> = values
            .iter()
            .map(|v| Length::parse_or_zero(v).to_emu(&ctx, Axis::X))
            .collect();
        assert_eq!(batch, scalar);
    }

    #[test]
    fn list_1() {
        let ctx = ConversionContext::default();
        assert_eq!(convert_list("10px, 1in 2em", &ctx, Axis::X),
                   vec![10.0, 96.0, 32.0]);
    }

    #[test]
    fn font_size_1() {
        let ctx = ConversionContext::default();
        assert_eq!(resolve_font_size("20", &ctx), 20.0);
        assert_eq!(resolve_font_size("2em", &ctx), 32.0);
        assert_eq!(resolve_font_size("150%", &ctx), 24.0);
        assert_eq!(resolve_font_size("12pt", &ctx), 16.0);
    }

    #[test]
    fn font_size_inherits_on_garbage() {
        // Unlike geometry attributes, a broken font-size keeps
        // the current value.
        let ctx = ConversionContext::default();
        assert_eq!(resolve_font_size("garbage", &ctx), 16.0);
        assert_eq!(resolve_font_size("", &ctx), 16.0);
    }

    #[test]
    fn font_size_named() {
        let ctx = ConversionContext::default();
        assert_eq!(resolve_font_size("medium", &ctx), 16.0);
        assert_eq!(resolve_font_size("larger", &ctx), 16.0 * 1.2);
        assert_eq!(resolve_font_size("x-small", &ctx), 16.0 * 1.2f64.powi(-2));
    }
}
