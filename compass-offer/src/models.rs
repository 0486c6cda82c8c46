use serde::{Deserialize, Serialize};
use compass_catalog::{CabinPrices, CabinType, OfferPriceHints, PriceSource, RetailFigure};

/// A casino-issued promotional offer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasinoOffer {
    pub id: String,
    pub name: String,
    pub reward_number: String,
    pub offer_name: String,
    pub offer_type: String,
    pub offer_type_category: Option<String>,
    pub expires: String,
    pub offer_code: String,
    pub trade_in_value: Option<String>,
    pub offer_expiry_date: Option<String>,
    pub offer_end_date: Option<String>,

    // Sailing the offer was imported against, when known
    pub ship_name: Option<String>,
    pub sailing_date: Option<String>,
    pub itinerary: Option<String>,
    pub room_type: Option<String>,

    // Per-class prices imported with the offer
    pub price_interior: Option<f64>,
    pub price_ocean_view: Option<f64>,
    pub price_balcony: Option<f64>,
    pub price_suite: Option<f64>,

    // Embedded valuation fields
    pub normalized_cabin_type: Option<CabinType>,
    pub per_person_price: Option<f64>,
    pub base_cabin_price: Option<f64>,
    pub comped_shares: Option<f64>,
    pub coverage_fraction: Option<f64>,
    pub comp_value: Option<f64>,
}

impl CasinoOffer {
    /// Offer code with surrounding whitespace removed
    pub fn code(&self) -> &str {
        self.offer_code.trim()
    }

    /// Offer type text used for share estimation; the category wins when present
    pub fn type_text(&self) -> &str {
        self.offer_type_category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.offer_type)
    }

    pub fn display_name(&self) -> &str {
        [self.offer_name.as_str(), self.name.as_str()]
            .into_iter()
            .find(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.code())
    }

    /// First expiry field carrying a value
    pub fn expiry_candidate(&self) -> Option<&str> {
        Some(self.expires.as_str())
            .into_iter()
            .chain(self.offer_expiry_date.as_deref())
            .chain(self.offer_end_date.as_deref())
            .find(|d| !d.trim().is_empty())
    }

    /// Ship and sailing date, only when both are present
    pub fn sailing_identity(&self) -> Option<(&str, &str)> {
        let ship = self.ship_name.as_deref().filter(|s| !s.is_empty())?;
        let date = self.sailing_date.as_deref().filter(|d| !d.is_empty())?;
        Some((ship, date))
    }

    pub fn cabin_prices(&self) -> CabinPrices {
        CabinPrices {
            interior: self.price_interior,
            oceanview: self.price_ocean_view,
            balcony: self.price_balcony,
            suite: self.price_suite,
        }
    }

    pub fn price_hints(&self) -> OfferPriceHints {
        OfferPriceHints {
            per_person_price: self.per_person_price,
            cabin_prices: self.cabin_prices(),
            base_cabin_price: self.base_cabin_price,
        }
    }
}

/// How a comp value was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ValueMethod {
    OfferEmbedded,
    CruisePricing,
    TradeIn,
    OfferName,
    Fallback,
}

impl ValueMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueMethod::OfferEmbedded => "offer-embedded",
            ValueMethod::CruisePricing => "cruise-pricing",
            ValueMethod::TradeIn => "trade-in",
            ValueMethod::OfferName => "offer-name",
            ValueMethod::Fallback => "fallback",
        }
    }
}

/// Valuation of one (offer, cruise?) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedValuation {
    pub offer_id: String,
    pub offer_code: String,
    pub offer_name: String,
    pub cruise_id: Option<String>,

    pub normalized_cabin_type: Option<CabinType>,
    pub per_person_price: Option<f64>,
    pub base_cabin_price: Option<f64>,
    pub comped_shares: Option<f64>,
    pub coverage_fraction: Option<f64>,
    pub comp_value: f64,

    pub method: ValueMethod,
    /// Price field behind a cruise-pricing valuation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_source: Option<PriceSource>,
    /// Retail figure behind the retail variant of cruise-pricing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail_figure: Option<RetailFigure>,
}

impl ResolvedValuation {
    /// Unvalued result for a pair, method `fallback`
    pub fn unvalued(offer: &CasinoOffer, cruise_id: Option<String>) -> Self {
        Self {
            offer_id: offer.id.clone(),
            offer_code: offer.code().to_string(),
            offer_name: offer.display_name().to_string(),
            cruise_id,
            normalized_cabin_type: None,
            per_person_price: None,
            base_cabin_price: None,
            comped_shares: None,
            coverage_fraction: None,
            comp_value: 0.0,
            method: ValueMethod::Fallback,
            price_source: None,
            retail_figure: None,
        }
    }

    /// Only positively valued pairs take part in rankings
    pub fn is_valued(&self) -> bool {
        self.comp_value > 0.0 && self.method != ValueMethod::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_offer_record() {
        let offer: CasinoOffer = serde_json::from_value(serde_json::json!({
            "id": "o-1",
            "offerName": "Balcony Room for Two",
            "offerType": "Free Cruise",
            "offerTypeCategory": "Balcony room for two",
            "expires": "2025-12-01",
            "offerCode": " 25NOV106 ",
            "tradeInValue": "$450",
            "priceOceanView": 399.0,
            "normalizedCabinType": "BALCONY"
        }))
        .unwrap();

        assert_eq!(offer.code(), "25NOV106");
        assert_eq!(offer.type_text(), "Balcony room for two");
        assert_eq!(offer.normalized_cabin_type, Some(CabinType::Balcony));
        assert_eq!(offer.cabin_prices().get(CabinType::Oceanview), Some(399.0));
        assert!(offer.comp_value.is_none());
    }

    #[test]
    fn test_type_text_falls_back_to_offer_type() {
        let offer = CasinoOffer {
            offer_type: "50% off guest".to_string(),
            offer_type_category: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(offer.type_text(), "50% off guest");
    }

    #[test]
    fn test_expiry_candidate_order() {
        let mut offer = CasinoOffer {
            offer_expiry_date: Some("2025-02-01".to_string()),
            offer_end_date: Some("2025-01-01".to_string()),
            ..Default::default()
        };
        assert_eq!(offer.expiry_candidate(), Some("2025-02-01"));

        offer.expires = "2025-03-01".to_string();
        assert_eq!(offer.expiry_candidate(), Some("2025-03-01"));
    }

    #[test]
    fn test_sailing_identity_needs_both_fields() {
        let mut offer = CasinoOffer { ship_name: Some("Icon of the Seas".to_string()), ..Default::default() };
        assert!(offer.sailing_identity().is_none());

        offer.sailing_date = Some("2025-06-01".to_string());
        assert_eq!(offer.sailing_identity(), Some(("Icon of the Seas", "2025-06-01")));
    }

    #[test]
    fn test_method_labels_match_serde() {
        for method in [ValueMethod::OfferEmbedded, ValueMethod::CruisePricing, ValueMethod::TradeIn] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
    }
}
