use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::design::{FrameDesign, MatSelection};
use crate::error::Result;

const SQ_IN_PER_SQ_FT: f64 = 144.0;
const IN_PER_FT: f64 = 12.0;

/// An amount of money in whole cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Rounds a dollar amount to the nearest cent. Amounts past the range of
    /// `Money` saturate, NaN is zero.
    pub fn from_dollars(dollars: f64) -> Self {
        Money((dollars * 100.0).round() as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    pub print_price_per_sq_ft: f64,
    /// Glass width + height above which the oversize fee applies.
    pub oversize_united_inches: f64,
    pub oversize_fee: f64,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            print_price_per_sq_ft: 12.0,
            oversize_united_inches: 80.0,
            oversize_fee: 35.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceQuote {
    pub frame: Money,
    pub mat: Money,
    pub glazing: Money,
    pub print: Money,
    pub oversize_fee: Money,
}

impl PriceQuote {
    pub fn line_items(&self) -> [(&'static str, Money); 5] {
        [
            ("Frame", self.frame),
            ("Mat", self.mat),
            ("Glazing", self.glazing),
            ("Print", self.print),
            ("Oversize fee", self.oversize_fee),
        ]
    }

    pub fn total(&self) -> Money {
        self.line_items().iter().map(|(_, amount)| *amount).sum()
    }
}

pub fn quote(
    design: &FrameDesign,
    catalog: &dyn Catalog,
    rules: &PricingRules,
) -> Result<PriceQuote> {
    design.check_artwork()?;

    let (glass_w, glass_h) = design.glass_size();
    let glass_sq_ft = glass_w * glass_h / SQ_IN_PER_SQ_FT;

    let frame = match &design.frame_style {
        Some(id) => {
            let style = catalog.require_frame_style(id)?;
            let feet = design.cut_list_for(style).total_length() / IN_PER_FT;
            Money::from_dollars(feet * style.price_per_foot)
        }
        None => Money::ZERO,
    };

    let mat = match &design.mat {
        _ if design.is_canvas() => Money::ZERO,
        MatSelection::None => Money::ZERO,
        MatSelection::Single { color } => {
            let board = catalog.require_mat_color(color)?;
            Money::from_dollars(glass_sq_ft * board.price_per_sq_ft)
        }
        MatSelection::Double { color, accent, .. } => {
            let top = catalog.require_mat_color(color)?;
            let under = catalog.require_mat_color(accent)?;
            Money::from_dollars(glass_sq_ft * (top.price_per_sq_ft + under.price_per_sq_ft))
        }
    };

    let glazing = match &design.glazing {
        Some(id) => {
            let glass = catalog.require_glazing(id)?;
            Money::from_dollars(glass_sq_ft * glass.price_per_sq_ft)
        }
        None => Money::ZERO,
    };

    let print = if design.include_print {
        let artwork_sq_ft = design.artwork_width * design.artwork_height / SQ_IN_PER_SQ_FT;
        Money::from_dollars(artwork_sq_ft * rules.print_price_per_sq_ft)
    } else {
        Money::ZERO
    };

    let united_inches = glass_w + glass_h;
    let oversize_fee = if united_inches > rules.oversize_united_inches {
        Money::from_dollars(rules.oversize_fee)
    } else {
        Money::ZERO
    };

    let quote = PriceQuote {
        frame,
        mat,
        glazing,
        print,
        oversize_fee,
    };
    log::debug!(
        "Quoted {}x{} design at {} ({} united inches)",
        design.artwork_width,
        design.artwork_height,
        quote.total(),
        united_inches
    );
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FrameStyle, Glazing, MatColor, StaticCatalog};
    use crate::error::FrameError;
    use crate::layout::MatBorders;

    fn catalog() -> StaticCatalog {
        StaticCatalog {
            frame_styles: vec![FrameStyle {
                id: "oak".to_string(),
                name: "Oak".to_string(),
                face_width: 1.0,
                rabbet: 0.25,
                price_per_foot: 12.0,
                color: [180, 140, 90],
            }],
            mat_colors: vec![
                MatColor {
                    id: "white".to_string(),
                    name: "White".to_string(),
                    price_per_sq_ft: 4.0,
                    color: [250, 250, 250],
                },
                MatColor {
                    id: "black".to_string(),
                    name: "Black".to_string(),
                    price_per_sq_ft: 6.0,
                    color: [10, 10, 10],
                },
            ],
            glazing: vec![Glazing {
                id: "clear".to_string(),
                name: "Clear".to_string(),
                price_per_sq_ft: 9.0,
            }],
        }
    }

    /// 12x12 artwork with a 3" mat gives an 18x18 (2.25 sq ft) glass.
    fn design() -> FrameDesign {
        FrameDesign {
            artwork_width: 12.0,
            artwork_height: 12.0,
            frame_style: Some("oak".to_string()),
            mat: MatSelection::Single {
                color: "white".to_string(),
            },
            mat_borders: MatBorders::uniform(3.0),
            glazing: Some("clear".to_string()),
            include_print: true,
            float_gap: 0.0,
        }
    }

    #[test]
    fn itemizes_each_line() {
        let quote = quote(&design(), &catalog(), &PricingRules::default()).unwrap();
        // Pieces 19.5in outer, 78in total = 6.5ft at $12.
        assert_eq!(quote.frame, Money(7800));
        assert_eq!(quote.mat, Money(900));
        assert_eq!(quote.glazing, Money(2025));
        // 1 sq ft of print at $12.
        assert_eq!(quote.print, Money(1200));
        assert_eq!(quote.oversize_fee, Money::ZERO);
        assert_eq!(quote.total(), Money(7800 + 900 + 2025 + 1200));
    }

    #[test]
    fn double_mat_charges_both_boards() {
        let design = FrameDesign {
            mat: MatSelection::Double {
                color: "white".to_string(),
                accent: "black".to_string(),
                reveal: 0.0,
            },
            ..design()
        };
        let quote = quote(&design, &catalog(), &PricingRules::default()).unwrap();
        assert_eq!(quote.mat, Money(2250));
    }

    #[test]
    fn bare_print_costs_only_print() {
        let design = FrameDesign {
            frame_style: None,
            mat: MatSelection::None,
            glazing: None,
            ..design()
        };
        let quote = quote(&design, &catalog(), &PricingRules::default()).unwrap();
        assert_eq!(quote.total(), quote.print);
    }

    #[test]
    fn oversize_fee_applies_above_threshold() {
        let rules = PricingRules {
            oversize_united_inches: 36.0,
            ..Default::default()
        };
        // Glass is exactly 36 united inches.
        let at_limit = quote(&design(), &catalog(), &rules).unwrap();
        assert_eq!(at_limit.oversize_fee, Money::ZERO);

        let bigger = FrameDesign {
            artwork_width: 12.5,
            ..design()
        };
        let over = quote(&bigger, &catalog(), &rules).unwrap();
        assert_eq!(over.oversize_fee, Money(3500));
    }

    #[test]
    fn line_items_round_to_cents() {
        let design = FrameDesign {
            artwork_width: 7.0,
            artwork_height: 7.0,
            frame_style: None,
            mat: MatSelection::None,
            glazing: Some("clear".to_string()),
            include_print: false,
            ..design()
        };
        // 49/144 sq ft * $9 = $3.0625
        let quote = quote(&design, &catalog(), &PricingRules::default()).unwrap();
        assert_eq!(quote.glazing, Money(306));
    }

    #[test]
    fn canvas_has_no_mat_charge() {
        let design = FrameDesign {
            float_gap: 0.5,
            glazing: None,
            include_print: false,
            ..design()
        };
        let quote = quote(&design, &catalog(), &PricingRules::default()).unwrap();
        assert_eq!(quote.mat, Money::ZERO);
        // 13x13 inside the frame, pieces 14.5in outer, 58in = 4.833ft at $12.
        assert_eq!(quote.frame, Money(5800));
    }

    #[test]
    fn invalid_artwork_is_rejected() {
        let design = FrameDesign {
            artwork_width: -1.0,
            ..design()
        };
        assert!(matches!(
            quote(&design, &catalog(), &PricingRules::default()),
            Err(FrameError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn unknown_glazing_is_rejected() {
        let design = FrameDesign {
            glazing: Some("museum".to_string()),
            ..design()
        };
        assert!(matches!(
            quote(&design, &catalog(), &PricingRules::default()),
            Err(FrameError::UnknownCatalogItem { kind: "glazing", .. })
        ));
    }

    #[test]
    fn huge_artwork_saturates_instead_of_overflowing() {
        let design = FrameDesign {
            artwork_width: 1e10,
            artwork_height: 1e10,
            ..design()
        };
        let quote = quote(&design, &catalog(), &PricingRules::default()).unwrap();
        assert_eq!(quote.glazing, Money(i64::MAX));
        assert_eq!(quote.print, Money(i64::MAX));
        assert_eq!(quote.total(), Money(i64::MAX));
    }

    #[test]
    fn money_sum_saturates() {
        assert_eq!(Money(i64::MAX) + Money(1), Money(i64::MAX));
        assert_eq!(Money(i64::MIN) + Money(-1), Money(i64::MIN));
        assert_eq!(Money::from_dollars(f64::NAN), Money::ZERO);
    }

    #[test]
    fn negative_borders_price_like_zero_borders() {
        let negative = FrameDesign {
            mat_borders: MatBorders::uniform(-20.0),
            ..design()
        };
        let zero = FrameDesign {
            mat_borders: MatBorders::NONE,
            ..design()
        };
        let rules = PricingRules::default();
        let negative = quote(&negative, &catalog(), &rules).unwrap();
        assert_eq!(negative, quote(&zero, &catalog(), &rules).unwrap());
        // 1 sq ft of glass at $9.
        assert_eq!(negative.glazing, Money(900));
    }

    #[test]
    fn money_display() {
        assert_eq!(Money(123456).to_string(), "$1234.56");
        assert_eq!(Money(5).to_string(), "$0.05");
        assert_eq!(Money(-250).to_string(), "-$2.50");
        assert_eq!(Money::from_dollars(3.0625), Money(306));
    }
}
