use serde::{Deserialize, Serialize};
use crate::amount::{extract_currency_value, positive_amount};
use crate::cabin::{CabinPrices, CabinType};

/// A bookable sailing with cabin-class pricing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cruise {
    pub id: String,
    pub ship: String,
    pub departure_date: String,
    pub itinerary_name: String,
    pub ports_route: Option<String>,
    pub cabin_type: Option<String>,

    // Dedicated per-class prices (per person)
    pub interior_price: Option<f64>,
    pub oceanview_price: Option<f64>,
    pub balcony_price: Option<f64>,
    pub suite_price: Option<f64>,

    // Nested pricing records, consulted current -> lowest -> generic
    pub pricing_current: Option<CabinPrices>,
    pub pricing_lowest: Option<CabinPrices>,
    pub pricing: Option<CabinPrices>,

    // Offer linkage
    pub offer_code: Option<String>,
    pub offer_codes: Vec<String>,
    pub offer_name: Option<String>,
    pub offer_expiration_date: Option<String>,

    // Retail figures
    pub value: Option<String>,
    pub current_market_price: Option<f64>,
    pub actual_fare: Option<f64>,
    pub paid_fare: Option<f64>,
}

/// Which retail figure a cruise-level fallback price came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RetailFigure {
    RetailValue,
    CurrentMarketPrice,
    ActualFare,
    PaidFare,
}

impl Cruise {
    /// Dedicated price field for a cabin class
    pub fn cabin_price(&self, cabin: CabinType) -> Option<f64> {
        match cabin {
            CabinType::Interior => self.interior_price,
            CabinType::Oceanview => self.oceanview_price,
            CabinType::Balcony => self.balcony_price,
            CabinType::Suite => self.suite_price,
        }
    }

    /// True when the cruise is linked to `code` through either offer-code field
    pub fn carries_offer_code(&self, code: &str) -> bool {
        self.offer_code.as_deref() == Some(code) || self.offer_codes.iter().any(|c| c == code)
    }

    /// First usable retail figure: parsed `value` text, then market price,
    /// actual fare, paid fare.
    pub fn retail_figure(&self) -> Option<(f64, RetailFigure)> {
        if let Some(amount) = self.value.as_deref().and_then(|v| extract_currency_value(v, true)) {
            return Some((amount, RetailFigure::RetailValue));
        }

        [
            (self.current_market_price, RetailFigure::CurrentMarketPrice),
            (self.actual_fare, RetailFigure::ActualFare),
            (self.paid_fare, RetailFigure::PaidFare),
        ]
        .into_iter()
        .find_map(|(amount, figure)| positive_amount(amount).map(|a| (a, figure)))
    }

    /// Best itinerary label available
    pub fn itinerary_label(&self) -> Option<&str> {
        if !self.itinerary_name.trim().is_empty() {
            Some(&self.itinerary_name)
        } else {
            self.ports_route.as_deref().filter(|r| !r.trim().is_empty())
        }
    }
}
