use std::f64::consts::PI;

use super::text::{PLACEHOLDER, format_score};

pub const RING_RADIUS: f64 = 36.0;

/// An sRGB color as three bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Qualitative band of a 0-100 health score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTier {
    High,
    Mid,
    Low,
}

impl HealthTier {
    pub const HIGH_THRESHOLD: f64 = 75.0;
    pub const MID_THRESHOLD: f64 = 50.0;

    pub fn for_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MID_THRESHOLD {
            Self::Mid
        } else {
            Self::Low
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::High => Rgb(0x06, 0xb6, 0xd4),
            Self::Mid => Rgb(0xf5, 0x9e, 0x0b),
            Self::Low => Rgb(0xf8, 0x71, 0x71),
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::High => "Strong — BRD ready for review",
            Self::Mid => "Moderate — resolve conflicts first",
            Self::Low => "Weak — major conflicts need resolution",
        }
    }
}

/// Ring gauge for the BRD health score.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthRing {
    pub score: Option<f64>,
    /// `None` renders an empty gauge.
    pub tier: Option<HealthTier>,
    pub circumference: f64,
    /// Length of the filled arc along the circumference.
    pub dash: f64,
    pub value_text: String,
    pub caption: &'static str,
}

impl HealthRing {
    pub const EMPTY_CAPTION: &'static str = "Upload documents to generate score";

    pub fn from_score(score: Option<f64>) -> Self {
        let circumference = 2.0 * PI * RING_RADIUS;
        match score.filter(|value| value.is_finite()) {
            Some(value) => {
                let tier = HealthTier::for_score(value);
                Self {
                    score: Some(value),
                    tier: Some(tier),
                    circumference,
                    dash: value.clamp(0.0, 100.0) / 100.0 * circumference,
                    value_text: format_score(value),
                    caption: tier.caption(),
                }
            }
            None => Self {
                score: None,
                tier: None,
                circumference,
                dash: 0.0,
                value_text: PLACEHOLDER.to_string(),
                caption: Self::EMPTY_CAPTION,
            },
        }
    }

    /// Filled share of the ring, 0 to 1.
    pub fn fraction(&self) -> f64 {
        if self.circumference > 0.0 {
            self.dash / self.circumference
        } else {
            0.0
        }
    }
}
