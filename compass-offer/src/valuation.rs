use compass_catalog::{extract_currency_value, positive_amount, CabinType, Cruise, PriceResolver};
use crate::models::{CasinoOffer, ResolvedValuation, ValueMethod};
use crate::rules::CompedShareEstimator;

/// One step of the valuation fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationStep {
    /// Positive comp value stored on the offer itself
    OfferEmbedded,
    /// Per-person cabin price x 2 x coverage
    CruisePricing,
    /// Cruise retail figure x coverage, when no cabin price exists
    CruiseRetail,
    /// Dollar amount parsed from the trade-in text
    TradeIn,
    /// Dollar amount parsed from the offer's display name
    OfferName,
}

/// Every step, used when a single pair is valued on request
pub const FULL_CHAIN: &[ValuationStep] = &[
    ValuationStep::OfferEmbedded,
    ValuationStep::CruisePricing,
    ValuationStep::CruiseRetail,
    ValuationStep::TradeIn,
    ValuationStep::OfferName,
];

/// Steps applied to an offer paired with a matched cruise
pub const MATCHED_CHAIN: &[ValuationStep] = &[
    ValuationStep::OfferEmbedded,
    ValuationStep::CruisePricing,
    ValuationStep::CruiseRetail,
];

/// Steps applied to an offer that matched no cruise
pub const UNMATCHED_CHAIN: &[ValuationStep] = &[
    ValuationStep::OfferEmbedded,
    ValuationStep::TradeIn,
    ValuationStep::OfferName,
];

/// Produces a comp value for an (offer, cruise?) pair
#[derive(Default)]
pub struct ValueResolver {
    price_resolver: PriceResolver,
    share_estimator: CompedShareEstimator,
}

impl ValueResolver {
    pub fn new(price_resolver: PriceResolver, share_estimator: CompedShareEstimator) -> Self {
        Self { price_resolver, share_estimator }
    }

    /// Value a pair with the full chain
    pub fn resolve(&self, offer: &CasinoOffer, cruise: Option<&Cruise>) -> ResolvedValuation {
        self.resolve_with(offer, cruise, FULL_CHAIN)
    }

    /// Value a pair with the given steps, stopping at the first positive
    /// result. Falls back to a zero `fallback` valuation.
    pub fn resolve_with(
        &self,
        offer: &CasinoOffer,
        cruise: Option<&Cruise>,
        steps: &[ValuationStep],
    ) -> ResolvedValuation {
        let cruise_id = cruise.map(|c| c.id.clone());

        for step in steps {
            let attempt = match step {
                ValuationStep::OfferEmbedded => self.offer_embedded(offer, cruise_id.clone()),
                ValuationStep::CruisePricing => cruise.and_then(|c| self.cruise_pricing(offer, c)),
                ValuationStep::CruiseRetail => cruise.and_then(|c| self.cruise_retail(offer, c)),
                ValuationStep::TradeIn => offer
                    .trade_in_value
                    .as_deref()
                    .and_then(|text| self.parsed_text(offer, cruise, text, ValueMethod::TradeIn)),
                ValuationStep::OfferName => {
                    self.parsed_text(offer, cruise, &offer.offer_name, ValueMethod::OfferName)
                }
            };

            if let Some(valuation) = attempt.filter(|v| v.comp_value > 0.0 && v.comp_value.is_finite()) {
                tracing::trace!(
                    offer_code = %valuation.offer_code,
                    cruise_id = ?valuation.cruise_id,
                    method = valuation.method.as_str(),
                    comp_value = valuation.comp_value,
                    "pair valued"
                );
                return valuation;
            }
        }

        let mut fallback = ResolvedValuation::unvalued(offer, cruise_id);
        fallback.normalized_cabin_type = self.cabin_type(offer, cruise);
        fallback
    }

    /// Shares covered by the offer and the resulting coverage fraction
    pub fn shares_and_coverage(&self, offer: &CasinoOffer) -> (f64, f64) {
        let shares = self.share_estimator.estimate(offer.code(), offer.type_text());
        (shares, shares / 2.0)
    }

    fn cabin_type(&self, offer: &CasinoOffer, cruise: Option<&Cruise>) -> Option<CabinType> {
        offer.normalized_cabin_type.or_else(|| {
            CabinType::resolve(offer.room_type.as_deref(), cruise.and_then(|c| c.cabin_type.as_deref()))
        })
    }

    fn offer_embedded(&self, offer: &CasinoOffer, cruise_id: Option<String>) -> Option<ResolvedValuation> {
        let comp_value = positive_amount(offer.comp_value)?;
        Some(ResolvedValuation {
            normalized_cabin_type: offer.normalized_cabin_type,
            per_person_price: positive_amount(offer.per_person_price),
            base_cabin_price: positive_amount(offer.base_cabin_price),
            comped_shares: positive_amount(offer.comped_shares),
            coverage_fraction: positive_amount(offer.coverage_fraction),
            comp_value,
            method: ValueMethod::OfferEmbedded,
            ..ResolvedValuation::unvalued(offer, cruise_id)
        })
    }

    fn cruise_pricing(&self, offer: &CasinoOffer, cruise: &Cruise) -> Option<ResolvedValuation> {
        let cabin = self.cabin_type(offer, Some(cruise));
        let price = self.price_resolver.resolve(&offer.price_hints(), Some(cruise), cabin)?;
        let (shares, coverage) = self.shares_and_coverage(offer);
        let base = price.amount * 2.0;

        Some(ResolvedValuation {
            normalized_cabin_type: cabin,
            per_person_price: Some(price.amount),
            base_cabin_price: Some(base),
            comped_shares: Some(shares),
            coverage_fraction: Some(coverage),
            comp_value: base * coverage,
            method: ValueMethod::CruisePricing,
            price_source: Some(price.source),
            ..ResolvedValuation::unvalued(offer, Some(cruise.id.clone()))
        })
    }

    fn cruise_retail(&self, offer: &CasinoOffer, cruise: &Cruise) -> Option<ResolvedValuation> {
        let cabin = self.cabin_type(offer, Some(cruise));
        // Retail only stands in when no cabin price resolves
        if self.price_resolver.resolve(&offer.price_hints(), Some(cruise), cabin).is_some() {
            return None;
        }
        let (retail, figure) = cruise.retail_figure()?;
        let (shares, coverage) = self.shares_and_coverage(offer);

        Some(ResolvedValuation {
            normalized_cabin_type: cabin,
            base_cabin_price: Some(retail),
            comped_shares: Some(shares),
            coverage_fraction: Some(coverage),
            comp_value: retail * coverage,
            method: ValueMethod::CruisePricing,
            retail_figure: Some(figure),
            ..ResolvedValuation::unvalued(offer, Some(cruise.id.clone()))
        })
    }

    fn parsed_text(
        &self,
        offer: &CasinoOffer,
        cruise: Option<&Cruise>,
        text: &str,
        method: ValueMethod,
    ) -> Option<ResolvedValuation> {
        let comp_value = extract_currency_value(text, false)?;
        let (shares, coverage) = self.shares_and_coverage(offer);

        Some(ResolvedValuation {
            normalized_cabin_type: self.cabin_type(offer, cruise),
            comped_shares: Some(shares),
            coverage_fraction: Some(coverage),
            comp_value,
            method,
            ..ResolvedValuation::unvalued(offer, cruise.map(|c| c.id.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_catalog::{CabinPrices, PriceSource, RetailFigure};

    fn offer(code: &str) -> CasinoOffer {
        CasinoOffer {
            id: format!("offer-{code}"),
            offer_code: code.to_string(),
            offer_name: "Casino Offer".to_string(),
            ..Default::default()
        }
    }

    fn oceanview_cruise(price: f64) -> Cruise {
        Cruise {
            id: "cruise-1".to_string(),
            ship: "Harmony of the Seas".to_string(),
            departure_date: "2025-04-12".to_string(),
            cabin_type: Some("Ocean View".to_string()),
            oceanview_price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn test_override_code_with_cruise_pricing() {
        let resolver = ValueResolver::default();
        let valuation = resolver.resolve(&offer("2511A06"), Some(&oceanview_cruise(400.0)));

        assert_eq!(valuation.method, ValueMethod::CruisePricing);
        assert_eq!(valuation.normalized_cabin_type, Some(CabinType::Oceanview));
        assert_eq!(valuation.per_person_price, Some(400.0));
        assert_eq!(valuation.base_cabin_price, Some(800.0));
        assert_eq!(valuation.comped_shares, Some(1.5));
        assert_eq!(valuation.coverage_fraction, Some(0.75));
        assert_eq!(valuation.comp_value, 600.0);
        assert_eq!(valuation.price_source, Some(PriceSource::CruiseCabinField));
    }

    #[test]
    fn test_embedded_value_ignores_cruise() {
        let resolver = ValueResolver::default();
        let mut embedded = offer("ABC");
        embedded.comp_value = Some(1234.5);
        embedded.comped_shares = Some(2.0);

        let with_cruise = resolver.resolve(&embedded, Some(&oceanview_cruise(400.0)));
        let without = resolver.resolve(&embedded, None);

        assert_eq!(with_cruise.comp_value, 1234.5);
        assert_eq!(without.comp_value, 1234.5);
        assert_eq!(with_cruise.method, ValueMethod::OfferEmbedded);
        assert_eq!(with_cruise.comped_shares, Some(2.0));
        assert_eq!(with_cruise.cruise_id.as_deref(), Some("cruise-1"));
    }

    #[test]
    fn test_retail_fallback_when_no_cabin_price() {
        let resolver = ValueResolver::default();
        let mut sale = offer("R1");
        sale.offer_type = "Guest 50% off".to_string();
        let cruise = Cruise {
            id: "cruise-2".to_string(),
            value: Some("$2,000".to_string()),
            ..Default::default()
        };

        let valuation = resolver.resolve_with(&sale, Some(&cruise), MATCHED_CHAIN);
        assert_eq!(valuation.method, ValueMethod::CruisePricing);
        assert_eq!(valuation.retail_figure, Some(RetailFigure::RetailValue));
        assert_eq!(valuation.comp_value, 1500.0);
        assert_eq!(valuation.per_person_price, None);
    }

    #[test]
    fn test_retail_not_used_when_price_exists() {
        let resolver = ValueResolver::default();
        let mut cruise = oceanview_cruise(300.0);
        cruise.current_market_price = Some(5000.0);

        let valuation = resolver.resolve(&offer("R2"), Some(&cruise));
        assert_eq!(valuation.comp_value, 600.0);
        assert!(valuation.retail_figure.is_none());
    }

    #[test]
    fn test_trade_in_text_without_cruise() {
        let resolver = ValueResolver::default();
        let mut free_play = offer("T1");
        free_play.trade_in_value = Some("Value: $250 Free Play".to_string());

        let valuation = resolver.resolve_with(&free_play, None, UNMATCHED_CHAIN);
        assert_eq!(valuation.method, ValueMethod::TradeIn);
        assert_eq!(valuation.comp_value, 250.0);
        assert_eq!(valuation.coverage_fraction, Some(1.0));
    }

    #[test]
    fn test_offer_name_parse() {
        let resolver = ValueResolver::default();
        let mut named = offer("N1");
        named.offer_name = "$1,500 Cruise Credit".to_string();
        named.trade_in_value = Some("none".to_string());

        let valuation = resolver.resolve_with(&named, None, UNMATCHED_CHAIN);
        assert_eq!(valuation.method, ValueMethod::OfferName);
        assert_eq!(valuation.comp_value, 1500.0);
    }

    #[test]
    fn test_matched_chain_skips_text_steps() {
        let resolver = ValueResolver::default();
        let mut named = offer("N2");
        named.trade_in_value = Some("$300".to_string());
        let bare = Cruise { id: "cruise-3".to_string(), ..Default::default() };

        let valuation = resolver.resolve_with(&named, Some(&bare), MATCHED_CHAIN);
        assert_eq!(valuation.method, ValueMethod::Fallback);
        assert_eq!(valuation.comp_value, 0.0);
        assert!(!valuation.is_valued());

        // The full chain does reach the trade-in text
        assert_eq!(resolver.resolve(&named, Some(&bare)).comp_value, 300.0);
    }

    #[test]
    fn test_offer_price_table_used_with_cruise_cabin_text() {
        let resolver = ValueResolver::default();
        let mut priced = offer("P1");
        priced.price_balcony = Some(700.0);
        priced.offer_type_category = Some("Guest 25% off".to_string());
        let cruise = Cruise {
            id: "cruise-4".to_string(),
            cabin_type: Some("Balcony".to_string()),
            balcony_price: Some(999.0),
            pricing: Some(CabinPrices::default()),
            ..Default::default()
        };

        let valuation = resolver.resolve(&priced, Some(&cruise));
        assert_eq!(valuation.per_person_price, Some(700.0));
        assert_eq!(valuation.comp_value, 700.0 * 2.0 * 0.625);
        assert_eq!(valuation.price_source, Some(PriceSource::OfferCabinClass));
    }

    #[test]
    fn test_cruise_pricing_formula_over_share_values() {
        let resolver = ValueResolver::default();
        let cases = [
            ("Room for two", 2.0),
            ("guest pays full", 1.0),
            ("75% off", 1.75),
            ("50% off", 1.5),
            ("25% off", 1.25),
        ];

        for (text, shares) in cases {
            let mut o = offer("F1");
            o.offer_type = text.to_string();
            let v = resolver.resolve(&o, Some(&oceanview_cruise(480.0)));
            assert_eq!(v.comped_shares, Some(shares));
            assert_eq!(v.comp_value, 480.0 * 2.0 * (shares / 2.0));
        }
    }
}
