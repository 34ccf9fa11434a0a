// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `viewBox` and `preserveAspectRatio` attribute parsing.

use crate::stream::Stream;

/// List of possible [`ViewBox`] parsing errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewBoxError {
    /// One of the numbers is invalid or missing.
    InvalidNumber,

    /// More than four numbers were provided.
    UnexpectedData,

    /// ViewBox has a negative or zero size.
    InvalidSize,
}

impl std::fmt::Display for ViewBoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ViewBoxError::InvalidNumber => {
                write!(f, "viewBox contains an invalid number")
            }
            ViewBoxError::UnexpectedData => {
                write!(f, "viewBox contains more than four numbers")
            }
            ViewBoxError::InvalidSize => {
                write!(f, "viewBox has a negative or zero size")
            }
        }
    }
}

impl std::error::Error for ViewBoxError {}

/// Representation of the [`<viewBox>`] type.
///
/// A parsed `ViewBox` is guaranteed to have a positive size. A string that
/// would produce anything else fails to parse; callers never receive a
/// valid-looking zero-filled value.
///
/// [`<viewBox>`]: https://www.w3.org/TR/SVG2/coords.html#ViewBoxAttribute
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ViewBox {
    /// Creates a new `ViewBox`.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        ViewBox { x, y, w, h }
    }

    /// Returns width/height.
    pub fn aspect_ratio(&self) -> f64 {
        self.w / self.h
    }
}

impl std::str::FromStr for ViewBox {
    type Err = ViewBoxError;

    fn from_str(text: &str) -> Result<Self, ViewBoxError> {
        let mut s = Stream::from(text);

        // Both whitespace and commas are accepted as separators.
        let x = s
            .parse_list_number()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let y = s
            .parse_list_number()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let w = s
            .parse_list_number()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let h = s
            .parse_list_number()
            .map_err(|_| ViewBoxError::InvalidNumber)?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(ViewBoxError::UnexpectedData);
        }

        if w <= 0.0 || h <= 0.0 {
            return Err(ViewBoxError::InvalidSize);
        }

        Ok(ViewBox::new(x, y, w, h))
    }
}

/// Representation of the `align` value of the [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[allow(missing_docs)]
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    None,
    XMinYMin,
    XMidYMin,
    XMaxYMin,
    XMinYMid,
    XMidYMid,
    XMaxYMid,
    XMinYMax,
    XMidYMax,
    XMaxYMax,
}

/// Leftover-space distribution factors per alignment.
///
/// Process-wide constant; safe to share across threads.
const ALIGN_FACTORS: [(Align, f64, f64); 10] = [
    (Align::None, 0.0, 0.0),
    (Align::XMinYMin, 0.0, 0.0),
    (Align::XMidYMin, 0.5, 0.0),
    (Align::XMaxYMin, 1.0, 0.0),
    (Align::XMinYMid, 0.0, 0.5),
    (Align::XMidYMid, 0.5, 0.5),
    (Align::XMaxYMid, 1.0, 0.5),
    (Align::XMinYMax, 0.0, 1.0),
    (Align::XMidYMax, 0.5, 1.0),
    (Align::XMaxYMax, 1.0, 1.0),
];

impl Align {
    /// Returns the `(x, y)` factors used to distribute leftover space
    /// after scaling.
    ///
    /// `(0, 0)` anchors content at the top-left, `(0.5, 0.5)` centers it,
    /// `(1, 1)` anchors at the bottom-right.
    pub fn factors(self) -> (f64, f64) {
        for &(align, fx, fy) in &ALIGN_FACTORS {
            if align == self {
                return (fx, fy);
            }
        }

        unreachable!()
    }
}

/// Representation of the `meetOrSlice` value of the
/// [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub enum MeetOrSlice {
    /// Scale to fit entirely inside the viewport. May letterbox.
    Meet,
    /// Scale to fully cover the viewport. May crop.
    Slice,
}

impl Default for MeetOrSlice {
    #[inline]
    fn default() -> Self {
        MeetOrSlice::Meet
    }
}

/// A `preserveAspectRatio` parsing error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AspectRatioError;

impl std::fmt::Display for AspectRatioError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid 'preserveAspectRatio' value")
    }
}

impl std::error::Error for AspectRatioError {}

/// Representation of the [`preserveAspectRatio`] attribute.
///
/// SVG 2 removed the `defer` keyword, but we still tolerate it on input.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub struct AspectRatio {
    /// `<align>` value.
    pub align: Align,
    /// `<meetOrSlice>` value.
    pub meet_or_slice: MeetOrSlice,
}

impl AspectRatio {
    /// Creates a new `AspectRatio`.
    pub fn new(align: Align, meet_or_slice: MeetOrSlice) -> Self {
        AspectRatio {
            align,
            meet_or_slice,
        }
    }

    /// Parses an attribute value, coercing anything unrecognized to the
    /// SVG default `xMidYMid meet`.
    ///
    /// Per the SVG spec an invalid `preserveAspectRatio` is not an error
    /// condition for rendering; the default applies.
    pub fn parse_or_default(text: &str) -> AspectRatio {
        match text.parse() {
            Ok(aspect) => aspect,
            Err(_) => {
                if !text.trim().is_empty() {
                    log::warn!(
                        "Invalid 'preserveAspectRatio' value: '{}'. \
                         Fallback to 'xMidYMid meet'.",
                        text
                    );
                }
                AspectRatio::default()
            }
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = AspectRatioError;

    fn from_str(text: &str) -> Result<Self, AspectRatioError> {
        let mut s = Stream::from(text);

        s.skip_spaces();

        // SVG 1.1 leftover. Ignored.
        if s.starts_with(b"defer ") {
            s.advance(6);
            s.skip_spaces();
        }

        // Keywords are case-sensitive.
        let align = match s.consume_ascii_ident() {
            "none" => Align::None,
            "xMinYMin" => Align::XMinYMin,
            "xMidYMin" => Align::XMidYMin,
            "xMaxYMin" => Align::XMaxYMin,
            "xMinYMid" => Align::XMinYMid,
            "xMidYMid" => Align::XMidYMid,
            "xMaxYMid" => Align::XMaxYMid,
            "xMinYMax" => Align::XMinYMax,
            "xMidYMax" => Align::XMidYMax,
            "xMaxYMax" => Align::XMaxYMax,
            _ => return Err(AspectRatioError),
        };

        s.skip_spaces();

        let mut meet_or_slice = MeetOrSlice::Meet;
        if !s.at_end() {
            match s.consume_ascii_ident() {
                "meet" | "" => {}
                "slice" => meet_or_slice = MeetOrSlice::Slice,
                _ => return Err(AspectRatioError),
            }

            s.skip_spaces();
            if !s.at_end() {
                return Err(AspectRatioError);
            }
        }

        Ok(AspectRatio {
            align,
            meet_or_slice,
        })
    }
}

impl Default for AspectRatio {
    #[inline]
    fn default() -> Self {
        AspectRatio {
            align: Align::XMidYMid,
            meet_or_slice: MeetOrSlice::Meet,
        }
    }
}
