//! Magnitude → marker style rules.
//!
//! The bucket table below is the only place the magnitude thresholds and
//! colors live; the legend is rendered from the same table.

use serde::{Deserialize, Serialize};

/// 半徑 = 規模 × 3
pub const RADIUS_SCALE: f64 = 3.0;

pub const MARKER_FILL_OPACITY: f64 = 0.6;

/// One of the six contiguous magnitude ranges driving marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnitudeBucket {
    BelowOne,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    FourToFive,
    FiveAndAbove,
}

impl MagnitudeBucket {
    /// Ascending order, as shown in the legend.
    pub const ALL: [MagnitudeBucket; 6] = [
        MagnitudeBucket::BelowOne,
        MagnitudeBucket::OneToTwo,
        MagnitudeBucket::TwoToThree,
        MagnitudeBucket::ThreeToFour,
        MagnitudeBucket::FourToFive,
        MagnitudeBucket::FiveAndAbove,
    ];

    /// First matching bucket wins, highest threshold first.
    ///
    /// Total over `f64`: `NaN` fails every comparison and lands in
    /// [`MagnitudeBucket::BelowOne`].
    pub fn from_magnitude(mag: f64) -> Self {
        if mag >= 5.0 {
            MagnitudeBucket::FiveAndAbove
        } else if mag >= 4.0 {
            MagnitudeBucket::FourToFive
        } else if mag >= 3.0 {
            MagnitudeBucket::ThreeToFour
        } else if mag >= 2.0 {
            MagnitudeBucket::TwoToThree
        } else if mag >= 1.0 {
            MagnitudeBucket::OneToTwo
        } else {
            MagnitudeBucket::BelowOne
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MagnitudeBucket::BelowOne => "#11FF00",
            MagnitudeBucket::OneToTwo => "#66FF00",
            MagnitudeBucket::TwoToThree => "#CCFF00",
            MagnitudeBucket::ThreeToFour => "#FFBB00",
            MagnitudeBucket::FourToFive => "#FF5500",
            MagnitudeBucket::FiveAndAbove => "#FF1100",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MagnitudeBucket::BelowOne => "0-1",
            MagnitudeBucket::OneToTwo => "1-2",
            MagnitudeBucket::TwoToThree => "2-3",
            MagnitudeBucket::ThreeToFour => "3-4",
            MagnitudeBucket::FourToFive => "4-5",
            MagnitudeBucket::FiveAndAbove => "5+",
        }
    }

    /// Inclusive lower threshold; `None` for the open-ended bottom bucket.
    pub fn lower_bound(self) -> Option<f64> {
        match self {
            MagnitudeBucket::BelowOne => None,
            MagnitudeBucket::OneToTwo => Some(1.0),
            MagnitudeBucket::TwoToThree => Some(2.0),
            MagnitudeBucket::ThreeToFour => Some(3.0),
            MagnitudeBucket::FourToFive => Some(4.0),
            MagnitudeBucket::FiveAndAbove => Some(5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: String,
}

/// No clamping: zero or negative magnitudes pass straight through.
pub fn marker_radius(mag: f64) -> f64 {
    mag * RADIUS_SCALE
}

pub fn marker_color(mag: f64) -> &'static str {
    MagnitudeBucket::from_magnitude(mag).color()
}

pub fn marker_style(mag: f64) -> MarkerStyle {
    MarkerStyle {
        radius: marker_radius(mag),
        fill_color: marker_color(mag).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_is_three_times_magnitude() {
        assert_eq!(marker_radius(4.5), 13.5);
        assert_eq!(marker_radius(0.5), 1.5);
        assert_eq!(marker_radius(6.0), 18.0);
        assert_eq!(marker_radius(0.0), 0.0);
        assert_eq!(marker_radius(-1.0), -3.0);
        assert!(marker_radius(f64::NAN).is_nan());
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(marker_color(3.0), "#FFBB00");
        assert_eq!(marker_color(2.999), "#CCFF00");
        assert_eq!(marker_color(1.0), "#66FF00");
        assert_eq!(marker_color(0.999), "#11FF00");
        assert_eq!(marker_color(4.0), "#FF5500");
        assert_eq!(marker_color(5.0), "#FF1100");
    }

    #[test]
    fn test_five_and_above_is_always_red() {
        for mag in [5.0, 5.1, 6.0, 7.5, 9.9, 100.0, f64::INFINITY] {
            assert_eq!(marker_color(mag), "#FF1100", "mag {}", mag);
        }
    }

    #[test]
    fn test_color_is_total() {
        assert_eq!(MagnitudeBucket::from_magnitude(f64::NAN), MagnitudeBucket::BelowOne);
        assert_eq!(
            MagnitudeBucket::from_magnitude(f64::NEG_INFINITY),
            MagnitudeBucket::BelowOne
        );
        assert_eq!(marker_color(-2.5), "#11FF00");
    }

    #[test]
    fn test_buckets_are_contiguous() {
        // 每個門檻正好是前一個桶的上界
        for pair in MagnitudeBucket::ALL.windows(2) {
            let upper = pair[1].lower_bound().unwrap();
            assert_eq!(MagnitudeBucket::from_magnitude(upper), pair[1]);
            assert_eq!(MagnitudeBucket::from_magnitude(upper - 1e-9), pair[0]);
        }
    }

    #[test]
    fn test_marker_style_pairs_radius_and_color() {
        let style = marker_style(3.2);
        assert!((style.radius - 9.6).abs() < 1e-9);
        assert_eq!(style.fill_color, "#FFBB00");
    }
}
