use serde::{Deserialize, Serialize};

/// Canonical cabin classes a room description can be reduced to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinType {
    Interior,
    Oceanview,
    Balcony,
    Suite,
}

/// Ordered substring patterns, first match wins.
/// SUITE outranks BALCONY so "Balcony Suite" is a suite.
const CABIN_PATTERNS: &[(&[&str], CabinType)] = &[
    (&["SUITE"], CabinType::Suite),
    (&["BALCONY"], CabinType::Balcony),
    (&["OCEAN VIEW", "OCEANVIEW"], CabinType::Oceanview),
    (&["INTERIOR", "INSIDE"], CabinType::Interior),
];

impl CabinType {
    /// Reduce a free-text room description to a cabin class
    pub fn from_description(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        CABIN_PATTERNS
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| upper.contains(n)))
            .map(|(_, cabin)| *cabin)
    }

    /// Resolve the cabin class for an offer/cruise pair.
    ///
    /// The offer's own text is tried first; the cruise text is only
    /// consulted when the offer text is missing or does not parse.
    pub fn resolve(offer_text: Option<&str>, cruise_text: Option<&str>) -> Option<Self> {
        offer_text
            .and_then(Self::from_description)
            .or_else(|| cruise_text.and_then(Self::from_description))
    }

    /// Field name used for this class inside nested pricing records
    pub fn field_name(&self) -> &'static str {
        match self {
            CabinType::Interior => "interior",
            CabinType::Oceanview => "oceanview",
            CabinType::Balcony => "balcony",
            CabinType::Suite => "suite",
        }
    }
}

impl std::fmt::Display for CabinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CabinType::Interior => "INTERIOR",
            CabinType::Oceanview => "OCEANVIEW",
            CabinType::Balcony => "BALCONY",
            CabinType::Suite => "SUITE",
        };
        f.write_str(label)
    }
}

/// Per-class price record (per person)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinPrices {
    pub interior: Option<f64>,
    pub oceanview: Option<f64>,
    pub balcony: Option<f64>,
    pub suite: Option<f64>,
}

impl CabinPrices {
    /// Raw value stored for a class, unvalidated
    pub fn get(&self, cabin: CabinType) -> Option<f64> {
        match cabin {
            CabinType::Interior => self.interior,
            CabinType::Oceanview => self.oceanview,
            CabinType::Balcony => self.balcony,
            CabinType::Suite => self.suite,
        }
    }
}
