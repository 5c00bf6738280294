//! Geographic primitives for the discovery map
//!
//! A `Viewport` is the visible map region the map surface reports after every
//! pan or zoom settles. Its rectangular `GeoBounds` drive the spatial filter
//! of a discovery query. Bounds are always derived from the viewport that
//! needs them, never cached across viewport changes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// A point on the map in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Angular extent of a viewport in degrees (validated newtype)
///
/// Both spans must be strictly positive and finite. A zero, negative, or
/// non-finite span cannot produce a usable bounding box, so such values
/// cannot be constructed.
///
/// # Examples
///
/// ```
/// use nearplay_domain::value_objects::ViewportSpan;
///
/// let span = ViewportSpan::new(0.06, 0.06).unwrap();
/// assert_eq!(span.lat_span(), 0.06);
///
/// assert!(ViewportSpan::new(0.0, 0.06).is_err());
/// assert!(ViewportSpan::new(0.06, -1.0).is_err());
/// assert!(ViewportSpan::new(f64::NAN, 0.06).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSpan {
    lat_span: f64,
    lng_span: f64,
}

impl ViewportSpan {
    /// Smallest span `clamped` will produce, in degrees.
    pub const MIN_SPAN: f64 = 1e-6;

    /// Create a new `ViewportSpan`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if either span is zero, negative, or not finite.
    pub fn new(lat_span: f64, lng_span: f64) -> Result<Self, DomainError> {
        // NaN fails every comparison, so the finiteness check must be explicit.
        if !lat_span.is_finite() || !lng_span.is_finite() || lat_span <= 0.0 || lng_span <= 0.0 {
            return Err(DomainError::validation(format!(
                "Viewport spans must be positive and finite, got {lat_span} x {lng_span}"
            )));
        }

        Ok(Self { lat_span, lng_span })
    }

    /// Create a span, falling back to `MIN_SPAN` for any non-positive or
    /// non-finite value instead of erroring. For configuration input where a
    /// bad value should degrade, not halt.
    pub fn clamped(lat_span: f64, lng_span: f64) -> Self {
        Self {
            lat_span: Self::sanitize(lat_span),
            lng_span: Self::sanitize(lng_span),
        }
    }

    fn sanitize(span: f64) -> f64 {
        if span.is_finite() {
            span.max(Self::MIN_SPAN)
        } else {
            Self::MIN_SPAN
        }
    }

    #[inline]
    pub const fn lat_span(self) -> f64 {
        self.lat_span
    }

    #[inline]
    pub const fn lng_span(self) -> f64 {
        self.lng_span
    }
}

/// The visible map region: a center point plus angular spans
///
/// The map surface emits one of these every time a pan or zoom settles. Each
/// value is an immutable snapshot of what the player is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    center: GeoPoint,
    span: ViewportSpan,
}

impl Viewport {
    /// Create a viewport from raw coordinates, validating the spans.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if either span is zero, negative, or not finite.
    pub fn new(
        center_lat: f64,
        center_lng: f64,
        lat_span: f64,
        lng_span: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            center: GeoPoint::new(center_lat, center_lng),
            span: ViewportSpan::new(lat_span, lng_span)?,
        })
    }

    /// Build a viewport around a point with an already-validated span.
    pub fn around(center: GeoPoint, span: ViewportSpan) -> Self {
        Self { center, span }
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[inline]
    pub fn span(&self) -> ViewportSpan {
        self.span
    }

    /// The rectangular bounding box covered by this viewport.
    ///
    /// Each edge sits half a span away from the center on its axis. Longitude
    /// wraparound at the 180th meridian is not handled: a straddling viewport
    /// produces a box extending past +-180 degrees, so sessions stored with a
    /// normalized longitude on the far side of the meridian fall outside it.
    /// Known limitation.
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds {
            min_lat: self.center.lat - self.span.lat_span / 2.0,
            max_lat: self.center.lat + self.span.lat_span / 2.0,
            min_lng: self.center.lng - self.span.lng_span / 2.0,
            max_lng: self.center.lng + self.span.lng_span / 2.0,
        }
    }
}

/// Axis-aligned rectangle in latitude/longitude space
///
/// Used as the spatial filter of a discovery query: a session is in view when
/// its position falls inside the bounds, edges included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Check if a point is within these bounds (inclusive on all edges)
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}
