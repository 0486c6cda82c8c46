use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use compass_catalog::Cruise;
use crate::models::CasinoOffer;
use crate::ranker::{sorted_by_value, RankingAggregator, ValuedSailing};
use crate::rules::is_override_code;

pub const OVERRIDE_NOTE: &str =
    "Special offer: Guest 1 fully comped + Guest 2 at 50% discount (75% total coverage)";
pub const FULL_COVERAGE_NOTE: &str = "Full room for two coverage (100%)";

/// 1-based positions of an offer code in both rankings.
///
/// Codes with equal totals keep their first-seen order from the stable
/// sort, so a tied code can rank below an equal one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankPosition {
    pub overall_rank: usize,
    pub jackpot_rank: usize,
    pub total_offers_compared: usize,
}

/// Full valued-sailing breakdown for one offer code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    pub offer_code: String,
    pub offer_name: String,
    pub offer_type: String,
    pub expires: String,

    pub num_sailings: usize,
    pub total_comp_value: f64,
    pub avg_comp_value_per_sailing: f64,
    pub min_sailing_value: f64,
    pub max_sailing_value: f64,

    pub sailings: Vec<ValuedSailing>,
    pub ranking: RankPosition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Composes the single-offer deep dive on top of the ranking grouping
pub struct OfferDetailComposer<'a> {
    aggregator: &'a RankingAggregator,
}

impl<'a> OfferDetailComposer<'a> {
    pub fn new(aggregator: &'a RankingAggregator) -> Self {
        Self { aggregator }
    }

    /// Detail for `offer_code`, or `None` when no record carries the code
    /// or none of its sailings values positively.
    pub fn compose(
        &self,
        offer_code: &str,
        offers: &[CasinoOffer],
        cruises: &[Cruise],
        generated_at: DateTime<Utc>,
    ) -> Option<OfferDetail> {
        let code = offer_code.trim();
        let Some(first) = offers.iter().find(|o| o.code() == code) else {
            tracing::warn!(offer_code = code, "offer not found");
            return None;
        };

        // Rank lookup needs the grouping over every offer, not just this code
        let entries = self.aggregator.group(offers, cruises);
        let Some(entry) = entries.iter().find(|e| e.offer_code == code) else {
            tracing::warn!(offer_code = code, "no valid sailings found for offer");
            return None;
        };

        let overall_rank = RankingAggregator::by_overall_strength(&entries)
            .iter()
            .position(|e| e.offer_code == code)
            .map_or(0, |p| p + 1);
        let jackpot_rank = RankingAggregator::by_jackpot(&entries)
            .iter()
            .position(|e| e.offer_code == code)
            .map_or(0, |p| p + 1);

        let sailings: Vec<ValuedSailing> = sorted_by_value(&entry.sailings).into_iter().cloned().collect();
        let special_notes = special_notes(code, &sailings);

        tracing::info!(
            offer_code = code,
            num_sailings = entry.num_sailings,
            total_comp_value = entry.total_comp_value,
            overall_rank,
            jackpot_rank,
            "offer details calculated"
        );

        Some(OfferDetail {
            offer_code: code.to_string(),
            offer_name: first.display_name().to_string(),
            offer_type: first.offer_type.clone(),
            expires: first.expires.clone(),
            num_sailings: entry.num_sailings,
            total_comp_value: entry.total_comp_value,
            avg_comp_value_per_sailing: entry.avg_comp_value,
            min_sailing_value: entry.min_sailing_value,
            max_sailing_value: entry.max_sailing_value,
            sailings,
            ranking: RankPosition {
                overall_rank,
                jackpot_rank,
                total_offers_compared: entries.len(),
            },
            special_notes,
            generated_at,
        })
    }
}

/// Notes for override codes and for the average coverage across sailings
pub fn special_notes(offer_code: &str, sailings: &[ValuedSailing]) -> Vec<String> {
    let mut notes = Vec::new();
    if is_override_code(offer_code) {
        notes.push(OVERRIDE_NOTE.to_string());
    }

    let coverages: Vec<f64> = sailings.iter().filter_map(|s| s.coverage_fraction).collect();
    if !coverages.is_empty() {
        let average = coverages.iter().sum::<f64>() / coverages.len() as f64;
        let percent = (average * 100.0).round() as i64;
        if percent == 100 {
            notes.push(FULL_COVERAGE_NOTE.to_string());
        } else if percent < 100 {
            notes.push(format!("Partial coverage: {percent}% of two-guest fare"));
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::OfferMatcher;
    use crate::models::ValueMethod;
    use crate::ranker::RankingOptions;
    use crate::valuation::ValueResolver;
    use chrono::TimeZone;

    fn aggregator() -> RankingAggregator {
        RankingAggregator::new(ValueResolver::default(), OfferMatcher::default(), RankingOptions::default())
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    fn ship_offer(id: &str, code: &str, ship: &str, date: &str) -> CasinoOffer {
        CasinoOffer {
            id: id.to_string(),
            offer_code: code.to_string(),
            offer_name: "Balcony Getaway".to_string(),
            offer_type: "Balcony room for two".to_string(),
            expires: "2025-08-31".to_string(),
            ship_name: Some(ship.to_string()),
            sailing_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn cruise(id: &str, ship: &str, date: &str, balcony: f64) -> Cruise {
        Cruise {
            id: id.to_string(),
            ship: ship.to_string(),
            departure_date: date.to_string(),
            cabin_type: Some("Balcony".to_string()),
            balcony_price: Some(balcony),
            ..Default::default()
        }
    }

    #[test]
    fn test_shared_code_across_ships() {
        let offers = vec![
            ship_offer("o1", "ABC123", "Oasis of the Seas", "2025-03-01"),
            ship_offer("o2", "ABC123", "Symphony of the Seas", "2025-04-01"),
        ];
        let cruises = vec![
            cruise("c1", "Oasis of the Seas", "2025-03-01", 500.0),
            cruise("c2", "Symphony of the Seas", "2025-04-01", 700.0),
        ];

        let aggregator = aggregator();
        let detail = OfferDetailComposer::new(&aggregator)
            .compose("ABC123", &offers, &cruises, at())
            .unwrap();

        assert_eq!(detail.num_sailings, 2);
        let ships: Vec<&str> = detail.sailings.iter().map(|s| s.ship.as_str()).collect();
        assert_eq!(ships, vec!["Symphony of the Seas", "Oasis of the Seas"]);
        assert_eq!(detail.total_comp_value, 2400.0);
        assert_eq!(detail.min_sailing_value, 1000.0);
        assert_eq!(detail.max_sailing_value, 1400.0);
        assert_eq!(detail.special_notes, vec![FULL_COVERAGE_NOTE.to_string()]);
        assert_eq!(detail.ranking, RankPosition { overall_rank: 1, jackpot_rank: 1, total_offers_compared: 1 });
    }

    #[test]
    fn test_rank_positions_against_all_offers() {
        let mut big_total = ship_offer("o1", "WIDE", "A", "2025-01-01");
        big_total.ship_name = None;
        big_total.sailing_date = None;
        let mut spike = ship_offer("o2", "SPIKE", "B", "2025-01-01");
        spike.ship_name = None;
        spike.sailing_date = None;

        let mut cruises = Vec::new();
        for (i, price) in [300.0, 300.0, 300.0].iter().enumerate() {
            let mut c = cruise(&format!("w{i}"), "A", "2025-01-01", *price);
            c.offer_code = Some("WIDE".to_string());
            cruises.push(c);
        }
        let mut big = cruise("s1", "B", "2025-01-01", 800.0);
        big.offer_code = Some("SPIKE".to_string());
        cruises.push(big);

        let aggregator = aggregator();
        let composer = OfferDetailComposer::new(&aggregator);
        let offers = vec![big_total, spike];

        let wide = composer.compose("WIDE", &offers, &cruises, at()).unwrap();
        assert_eq!((wide.ranking.overall_rank, wide.ranking.jackpot_rank), (1, 2));

        let spike = composer.compose("SPIKE", &offers, &cruises, at()).unwrap();
        assert_eq!((spike.ranking.overall_rank, spike.ranking.jackpot_rank), (2, 1));
        assert_eq!(spike.ranking.total_offers_compared, 2);
    }

    #[test]
    fn test_tied_totals_rank_by_first_seen_order() {
        let tied = |id: &str, code: &str| CasinoOffer {
            id: id.to_string(),
            offer_code: code.to_string(),
            offer_name: "Tied".to_string(),
            comp_value: Some(500.0),
            ..Default::default()
        };
        let offers = vec![tied("o1", "FIRST"), tied("o2", "SECOND")];

        let aggregator = aggregator();
        let composer = OfferDetailComposer::new(&aggregator);

        let first = composer.compose("FIRST", &offers, &[], at()).unwrap();
        let second = composer.compose("SECOND", &offers, &[], at()).unwrap();
        assert_eq!((first.ranking.overall_rank, first.ranking.jackpot_rank), (1, 1));
        assert_eq!((second.ranking.overall_rank, second.ranking.jackpot_rank), (2, 2));
    }

    #[test]
    fn test_not_found_cases() {
        let aggregator = aggregator();
        let composer = OfferDetailComposer::new(&aggregator);
        assert!(composer.compose("NOPE", &[], &[], at()).is_none());

        let unvalued = CasinoOffer {
            id: "o1".to_string(),
            offer_code: "EMPTY".to_string(),
            offer_name: "Mystery".to_string(),
            ..Default::default()
        };
        assert!(composer.compose("EMPTY", &[unvalued], &[], at()).is_none());
    }

    #[test]
    fn test_override_and_partial_notes() {
        let sailing = ValuedSailing {
            offer_id: "o1".to_string(),
            cruise_id: None,
            ship: "Oasis".to_string(),
            sailing_date: "2025-03-01".to_string(),
            room_type: "Interior".to_string(),
            normalized_cabin_type: None,
            itinerary: "Bahamas".to_string(),
            comp_value: 600.0,
            per_person_price: Some(400.0),
            comped_shares: Some(1.5),
            coverage_fraction: Some(0.75),
            method: ValueMethod::CruisePricing,
        };

        let notes = special_notes("2511A06", &[sailing.clone()]);
        assert_eq!(notes, vec![OVERRIDE_NOTE.to_string(), "Partial coverage: 75% of two-guest fare".to_string()]);

        let mut uncovered = sailing;
        uncovered.coverage_fraction = None;
        assert!(special_notes("X", &[uncovered]).is_empty());
    }
}
