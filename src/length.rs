use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

pub const MM_PER_INCH: f64 = 25.4;

/// Denominator used when showing fractional inches.
const FRACTION_DENOMINATOR: i32 = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::InchesFractional)
    }

    pub fn to_mm(&self) -> f64 {
        self.value * self.unit.to_mm_factor()
    }

    pub fn from_mm(mm: f64, unit: LengthUnit) -> Self {
        Self {
            value: mm / unit.to_mm_factor(),
            unit,
        }
    }

    pub fn to_inches(&self) -> f64 {
        self.to_mm() / MM_PER_INCH
    }

    pub fn from_inches(inches: f64, unit: LengthUnit) -> Self {
        Self::from_mm(inches * MM_PER_INCH, unit)
    }

    pub fn convert(&self, unit: LengthUnit) -> Self {
        Self::from_mm(self.to_mm(), unit)
    }

    pub fn format_value(&self) -> String {
        match self.unit {
            LengthUnit::Meters => format!("{:.3}", self.value),
            LengthUnit::Centimeters => format!("{:.2}", self.value),
            LengthUnit::Millimeters => format!("{:.1}", self.value),
            LengthUnit::InchesDecimal => format!("{:.3}", self.value),
            LengthUnit::InchesFractional => format_fractional_inches(self.value),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.format_value(), self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Meters,
    Centimeters,
    Millimeters,
    InchesFractional,
    InchesDecimal,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Meters,
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
        LengthUnit::InchesDecimal,
        LengthUnit::InchesFractional,
    ];

    pub fn to_mm_factor(&self) -> f64 {
        match self {
            LengthUnit::Meters => 1000.0,
            LengthUnit::Centimeters => 10.0,
            LengthUnit::Millimeters => 1.0,
            LengthUnit::InchesDecimal | LengthUnit::InchesFractional => MM_PER_INCH,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Meters => write!(f, "m"),
            LengthUnit::Centimeters => write!(f, "cm"),
            LengthUnit::Millimeters => write!(f, "mm"),
            LengthUnit::InchesDecimal => write!(f, ".in"),
            LengthUnit::InchesFractional => write!(f, "in"),
        }
    }
}

/// Formats inches as a whole number plus a reduced fraction of 1/32.
pub fn format_fractional_inches(inches: f64) -> String {
    let sign = if inches < 0.0 { "-" } else { "" };
    let inches = inches.abs();
    let whole = inches.floor();
    let numerator = ((inches - whole) * FRACTION_DENOMINATOR as f64).round() as i32;

    if numerator == 0 {
        format!("{}{}", sign, whole)
    } else if numerator == FRACTION_DENOMINATOR {
        format!("{}{}", sign, whole + 1.0)
    } else {
        let gcd = gcd(numerator, FRACTION_DENOMINATOR);
        let (num, den) = (numerator / gcd, FRACTION_DENOMINATOR / gcd);
        if whole == 0.0 {
            format!("{}{}/{}", sign, num, den)
        } else {
            format!("{}{} {}/{}", sign, whole, num, den)
        }
    }
}

/// Parses a non-negative dimension typed by a user.
///
/// Accepts decimals (`16.5`), bare fractions (`3/4`) and mixed numbers
/// written with a space or a dash (`16 1/2`, `16-1/2`).
pub fn parse_dimension(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FrameError::Parse("empty dimension".to_string()));
    }

    let value = match split_mixed_number(text) {
        (single, None) if single.contains('/') => parse_fraction(single)?,
        (single, None) => parse_number(single)?,
        (whole, Some(fraction)) => {
            if whole.contains('/') || !fraction.contains('/') {
                return Err(FrameError::Parse(format!("malformed mixed number '{}'", text)));
            }
            parse_number(whole)? + parse_fraction(fraction)?
        }
    };

    if !value.is_finite() || value < 0.0 {
        return Err(FrameError::Parse(format!("dimension out of range '{}'", text)));
    }
    Ok(value)
}

fn split_mixed_number(text: &str) -> (&str, Option<&str>) {
    if let Some((whole, fraction)) = text.split_once(char::is_whitespace) {
        return (whole, Some(fraction.trim()));
    }
    match text.split_once('-') {
        Some((whole, fraction)) if !whole.is_empty() => (whole, Some(fraction)),
        _ => (text, None),
    }
}

fn parse_number(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| FrameError::Parse(format!("not a number '{}'", s)))
}

fn parse_fraction(s: &str) -> Result<f64> {
    let (numerator, denominator) = s
        .split_once('/')
        .ok_or_else(|| FrameError::Parse(format!("not a fraction '{}'", s)))?;
    let numerator = parse_number(numerator.trim())?;
    let denominator = parse_number(denominator.trim())?;
    if denominator == 0.0 {
        return Err(FrameError::Parse(format!("zero denominator in '{}'", s)));
    }
    Ok(numerator / denominator)
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a.abs()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_inches: f64,
    pub max_inches: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_inches: 1.0,
            max_inches: 60.0,
        }
    }
}

/// Why an artwork size cannot be previewed. `Display` is shown to the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeIssue {
    NotPositive,
    TooSmall { min: f64 },
    TooLarge { max: f64 },
}

impl fmt::Display for SizeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeIssue::NotPositive => write!(f, "Enter a width and height greater than zero."),
            SizeIssue::TooSmall { min } => {
                let min = format_fractional_inches(*min);
                write!(f, "Artwork must be at least {}\" on each side.", min)
            }
            SizeIssue::TooLarge { max } => {
                let max = format_fractional_inches(*max);
                write!(f, "Artwork can be at most {}\" on each side.", max)
            }
        }
    }
}

pub fn validate_artwork_size(
    width: f64,
    height: f64,
    limits: &SizeLimits,
) -> Result<(), SizeIssue> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(SizeIssue::NotPositive);
    }
    if width < limits.min_inches || height < limits.min_inches {
        return Err(SizeIssue::TooSmall {
            min: limits.min_inches,
        });
    }
    if width > limits.max_inches || height > limits.max_inches {
        return Err(SizeIssue::TooLarge {
            max: limits.max_inches,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimals_fractions_and_mixed_numbers() {
        assert_eq!(parse_dimension("16").unwrap(), 16.0);
        assert_eq!(parse_dimension(" 16.5 ").unwrap(), 16.5);
        assert_eq!(parse_dimension("3/4").unwrap(), 0.75);
        assert_eq!(parse_dimension("16 1/2").unwrap(), 16.5);
        assert_eq!(parse_dimension("16-1/4").unwrap(), 16.25);
        assert_eq!(parse_dimension("8   3/8").unwrap(), 8.375);
    }

    #[test]
    fn rejects_bad_dimension_text() {
        for text in ["", "   ", "abc", "1/0", "16 1/2 3", "16 2", "-4", "1/2 1/2", "16-"] {
            assert!(
                matches!(parse_dimension(text), Err(FrameError::Parse(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn formats_fractional_inches() {
        assert_eq!(format_fractional_inches(16.0), "16");
        assert_eq!(format_fractional_inches(16.5), "16 1/2");
        assert_eq!(format_fractional_inches(0.09375), "3/32");
        assert_eq!(format_fractional_inches(7.999), "8");
        assert_eq!(format_fractional_inches(-1.25), "-1 1/4");
    }

    #[test]
    fn unit_conversion() {
        let length = Length::inches(2.0);
        assert!((length.to_mm() - 50.8).abs() < 1e-9);
        let cm = length.convert(LengthUnit::Centimeters);
        assert!((cm.value - 5.08).abs() < 1e-9);
        assert!((cm.to_inches() - 2.0).abs() < 1e-9);
        assert_eq!(Length::new(1.5, LengthUnit::InchesFractional).to_string(), "1 1/2 in");
    }

    #[test]
    fn size_validation() {
        let limits = SizeLimits::default();
        assert_eq!(validate_artwork_size(16.0, 20.0, &limits), Ok(()));
        assert_eq!(validate_artwork_size(0.0, 20.0, &limits), Err(SizeIssue::NotPositive));
        assert_eq!(
            validate_artwork_size(f64::NAN, 20.0, &limits),
            Err(SizeIssue::NotPositive)
        );
        assert_eq!(
            validate_artwork_size(0.5, 20.0, &limits),
            Err(SizeIssue::TooSmall { min: 1.0 })
        );
        assert_eq!(
            validate_artwork_size(16.0, 72.0, &limits),
            Err(SizeIssue::TooLarge { max: 60.0 })
        );
        assert_eq!(
            SizeIssue::TooLarge { max: 60.0 }.to_string(),
            "Artwork can be at most 60\" on each side."
        );
    }
}
