use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// sRGB color as stored in catalog files.
pub type Rgb = [u8; 3];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    pub id: String,
    pub name: String,
    /// Visible moulding face in inches.
    pub face_width: f64,
    /// Lip that overlaps the glass, inches.
    #[serde(default)]
    pub rabbet: f64,
    pub price_per_foot: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatColor {
    pub id: String,
    pub name: String,
    pub price_per_sq_ft: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Glazing {
    pub id: String,
    pub name: String,
    pub price_per_sq_ft: f64,
}

pub trait Catalog {
    fn frame_styles(&self) -> &[FrameStyle];
    fn mat_colors(&self) -> &[MatColor];
    fn glazings(&self) -> &[Glazing];

    fn frame_style(&self, id: &str) -> Option<&FrameStyle> {
        self.frame_styles().iter().find(|f| f.id == id)
    }

    fn mat_color(&self, id: &str) -> Option<&MatColor> {
        self.mat_colors().iter().find(|m| m.id == id)
    }

    fn glazing(&self, id: &str) -> Option<&Glazing> {
        self.glazings().iter().find(|g| g.id == id)
    }

    fn require_frame_style(&self, id: &str) -> Result<&FrameStyle> {
        self.frame_style(id).ok_or_else(|| unknown("frame style", id))
    }

    fn require_mat_color(&self, id: &str) -> Result<&MatColor> {
        self.mat_color(id).ok_or_else(|| unknown("mat color", id))
    }

    fn require_glazing(&self, id: &str) -> Result<&Glazing> {
        self.glazing(id).ok_or_else(|| unknown("glazing", id))
    }
}

fn unknown(kind: &'static str, id: &str) -> FrameError {
    FrameError::UnknownCatalogItem {
        kind,
        id: id.to_string(),
    }
}

/// Catalog held in memory, usually loaded once at startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub frame_styles: Vec<FrameStyle>,
    #[serde(default)]
    pub mat_colors: Vec<MatColor>,
    #[serde(default)]
    pub glazing: Vec<Glazing>,
}

impl StaticCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: StaticCatalog = serde_json::from_str(json)?;
        catalog.check()?;
        log::debug!(
            "Loaded catalog with {} frames, {} mats, {} glazing options",
            catalog.frame_styles.len(),
            catalog.mat_colors.len(),
            catalog.glazing.len()
        );
        Ok(catalog)
    }

    /// The catalog bundled with the app.
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("../assets/catalog.json"))
    }

    fn check(&self) -> Result<()> {
        check_unique("frame style", self.frame_styles.iter().map(|f| f.id.as_str()))?;
        check_unique("mat color", self.mat_colors.iter().map(|m| m.id.as_str()))?;
        check_unique("glazing", self.glazing.iter().map(|g| g.id.as_str()))?;

        for frame in &self.frame_styles {
            if [frame.face_width, frame.rabbet, frame.price_per_foot]
                .iter()
                .any(|v| !is_non_negative(*v))
            {
                return Err(FrameError::Catalog(format!(
                    "frame style '{}' has a negative measurement or price",
                    frame.id
                )));
            }
        }
        let priced = self
            .mat_colors
            .iter()
            .map(|m| (m.id.as_str(), m.price_per_sq_ft))
            .chain(self.glazing.iter().map(|g| (g.id.as_str(), g.price_per_sq_ft)));
        for (id, price) in priced {
            if !is_non_negative(price) {
                return Err(FrameError::Catalog(format!("'{}' has a negative price", id)));
            }
        }
        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FrameError::Catalog(format!("duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(())
}

impl Catalog for StaticCatalog {
    fn frame_styles(&self) -> &[FrameStyle] {
        &self.frame_styles
    }

    fn mat_colors(&self) -> &[MatColor] {
        &self.mat_colors
    }

    fn glazings(&self) -> &[Glazing] {
        &self.glazing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "frame_styles": [
            {"id": "oak", "name": "Oak", "face_width": 1.0, "rabbet": 0.25,
             "price_per_foot": 8.0, "color": [180, 140, 90]}
        ],
        "mat_colors": [
            {"id": "white", "name": "White", "price_per_sq_ft": 4.0, "color": [250, 250, 250]}
        ],
        "glazing": [
            {"id": "clear", "name": "Clear", "price_per_sq_ft": 5.0}
        ]
    }"#;

    #[test]
    fn lookup_by_id() {
        let catalog = StaticCatalog::from_json(SMALL).unwrap();
        assert_eq!(catalog.frame_style("oak").unwrap().face_width, 1.0);
        assert_eq!(catalog.mat_color("white").unwrap().color, [250, 250, 250]);
        assert_eq!(catalog.glazing("clear").unwrap().price_per_sq_ft, 5.0);
        assert!(catalog.frame_style("maple").is_none());
    }

    #[test]
    fn require_reports_unknown_ids() {
        let catalog = StaticCatalog::from_json(SMALL).unwrap();
        match catalog.require_mat_color("black") {
            Err(FrameError::UnknownCatalogItem { kind, id }) => {
                assert_eq!(kind, "mat color");
                assert_eq!(id, "black");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"glazing": [
            {"id": "clear", "name": "Clear", "price_per_sq_ft": 5.0},
            {"id": "clear", "name": "Clear again", "price_per_sq_ft": 6.0}
        ]}"#;
        assert!(matches!(
            StaticCatalog::from_json(json),
            Err(FrameError::Catalog(msg)) if msg.contains("duplicate glazing")
        ));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let json = r#"{"mat_colors": [
            {"id": "cream", "name": "Cream", "price_per_sq_ft": -1.0, "color": [1, 2, 3]}
        ]}"#;
        assert!(matches!(StaticCatalog::from_json(json), Err(FrameError::Catalog(_))));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            StaticCatalog::from_json("{\"frame_styles\": 3}"),
            Err(FrameError::Json(_))
        ));
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = StaticCatalog::builtin().unwrap();
        assert!(!catalog.frame_styles().is_empty());
        assert!(!catalog.mat_colors().is_empty());
        assert!(!catalog.glazings().is_empty());
    }

    #[test]
    fn json_round_trip() {
        let catalog = StaticCatalog::from_json(SMALL).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(StaticCatalog::from_json(&json).unwrap(), catalog);
    }
}
