use serde::{Deserialize, Serialize};
use crate::amount::positive_amount;
use crate::cabin::{CabinPrices, CabinType};
use crate::cruise::Cruise;

/// Price fields an offer may carry on its own
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferPriceHints {
    /// Explicit per-person price for the offer's cabin class
    pub per_person_price: Option<f64>,
    /// Per-class price table imported with the offer
    pub cabin_prices: CabinPrices,
    /// Two-person cabin price
    pub base_cabin_price: Option<f64>,
}

/// Where a per-person price was found
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSource {
    OfferPerPerson,
    OfferCabinClass,
    OfferBaseCabin,
    CruiseCabinField,
    CruiseCurrentPricing,
    CruiseLowestPricing,
    CruisePricing,
}

/// A resolved per-person price and its origin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PerPersonPrice {
    pub amount: f64,
    pub source: PriceSource,
}

/// Resolves one authoritative per-person cabin price.
///
/// Candidates are tried in a fixed order and the first finite, strictly
/// positive one wins:
/// 1. the offer's explicit per-person price (or its per-class table entry)
/// 2. the offer's two-person base price halved
/// 3. the cruise's dedicated field for the cabin class
/// 4. the cruise's nested pricing records: current, lowest, generic
///
/// Steps 3 and 4 need a normalized cabin class and are skipped without one.
#[derive(Debug, Clone, Default)]
pub struct PriceResolver;

impl PriceResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        offer: &OfferPriceHints,
        cruise: Option<&Cruise>,
        cabin: Option<CabinType>,
    ) -> Option<PerPersonPrice> {
        let found = self
            .from_offer(offer, cabin)
            .or_else(|| cabin.zip(cruise).and_then(|(c, cr)| self.from_cruise(cr, c)));

        if let Some(price) = &found {
            tracing::trace!(amount = price.amount, source = ?price.source, "per-person price resolved");
        }
        found
    }

    fn from_offer(&self, offer: &OfferPriceHints, cabin: Option<CabinType>) -> Option<PerPersonPrice> {
        let explicit = positive_amount(offer.per_person_price)
            .map(|amount| PerPersonPrice { amount, source: PriceSource::OfferPerPerson });
        if explicit.is_some() {
            return explicit;
        }

        let by_class = cabin
            .and_then(|c| positive_amount(offer.cabin_prices.get(c)))
            .map(|amount| PerPersonPrice { amount, source: PriceSource::OfferCabinClass });
        if by_class.is_some() {
            return by_class;
        }

        positive_amount(offer.base_cabin_price)
            .map(|base| PerPersonPrice { amount: base / 2.0, source: PriceSource::OfferBaseCabin })
    }

    fn from_cruise(&self, cruise: &Cruise, cabin: CabinType) -> Option<PerPersonPrice> {
        let candidates = [
            (cruise.cabin_price(cabin), PriceSource::CruiseCabinField),
            (cruise.pricing_current.as_ref().and_then(|p| p.get(cabin)), PriceSource::CruiseCurrentPricing),
            (cruise.pricing_lowest.as_ref().and_then(|p| p.get(cabin)), PriceSource::CruiseLowestPricing),
            (cruise.pricing.as_ref().and_then(|p| p.get(cabin)), PriceSource::CruisePricing),
        ];

        candidates
            .into_iter()
            .find_map(|(amount, source)| positive_amount(amount).map(|amount| PerPersonPrice { amount, source }))
    }
}
