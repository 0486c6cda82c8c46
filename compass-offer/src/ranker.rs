use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use compass_catalog::{CabinType, Cruise};
use crate::matcher::OfferMatcher;
use crate::models::{CasinoOffer, ResolvedValuation, ValueMethod};
use crate::valuation::{ValueResolver, MATCHED_CHAIN, UNMATCHED_CHAIN};

/// Size limits for ranking output
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingOptions {
    /// Entries kept in each ranking
    pub limit: usize,
    /// Highest-value sailings sampled per entry
    pub sample_size: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self { limit: 10, sample_size: 3 }
    }
}

/// One positively valued (offer, cruise?) pair with display fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuedSailing {
    pub offer_id: String,
    pub cruise_id: Option<String>,
    pub ship: String,
    pub sailing_date: String,
    pub room_type: String,
    pub normalized_cabin_type: Option<CabinType>,
    pub itinerary: String,
    pub comp_value: f64,
    pub per_person_price: Option<f64>,
    pub comped_shares: Option<f64>,
    pub coverage_fraction: Option<f64>,
    pub method: ValueMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleSailing {
    pub ship_name: String,
    pub sailing_date: String,
    pub normalized_cabin_type: Option<CabinType>,
    pub comp_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaxSailingDetails {
    pub ship: String,
    pub sailing_date: String,
    pub room_type: String,
    pub itinerary: String,
}

/// Aggregate statistics for one offer code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub offer_code: String,
    pub offer_name: String,
    pub num_sailings: usize,
    pub total_comp_value: f64,
    pub avg_comp_value: f64,
    pub min_sailing_value: f64,
    pub max_sailing_value: f64,
    /// Lexically smallest expiry among contributing offer records
    pub earliest_expiry: Option<String>,
    pub sample_cruises: Vec<SampleSailing>,
    pub max_sailing_details: MaxSailingDetails,
    #[serde(skip)]
    pub sailings: Vec<ValuedSailing>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferRankings {
    pub overall_strength: Vec<RankingEntry>,
    pub single_sailing_jackpot: Vec<RankingEntry>,
    pub total_offers: usize,
    pub total_sailings: usize,
    pub generated_at: DateTime<Utc>,
}

/// Sailings collected for one offer code before statistics are computed
struct OfferGroup {
    offer_code: String,
    offer_name: String,
    earliest_expiry: Option<String>,
    sailings: Vec<ValuedSailing>,
    seen_cruises: HashSet<CruiseKey>,
}

/// Identity of a cruise within one snapshot. Records without an id are
/// told apart by their position in the cruise list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CruiseKey {
    Id(String),
    Position(usize),
}

impl CruiseKey {
    fn of(position: usize, cruise: &Cruise) -> Self {
        match cruise.id.trim() {
            "" => CruiseKey::Position(position),
            id => CruiseKey::Id(id.to_string()),
        }
    }
}

impl OfferGroup {
    fn new(offer: &CasinoOffer) -> Self {
        Self {
            offer_code: offer.code().to_string(),
            offer_name: offer.display_name().to_string(),
            earliest_expiry: None,
            sailings: Vec::new(),
            seen_cruises: HashSet::new(),
        }
    }

    // Plain string comparison; ISO dates order correctly, anything else may not
    fn track_expiry(&mut self, candidate: Option<&str>) {
        if let Some(candidate) = candidate.filter(|c| !c.trim().is_empty()) {
            let earlier = match &self.earliest_expiry {
                Some(current) => candidate < current.as_str(),
                None => true,
            };
            if earlier {
                self.earliest_expiry = Some(candidate.to_string());
            }
        }
    }

    fn into_entry(self, sample_size: usize) -> Option<RankingEntry> {
        let first = self.sailings.first()?;
        let total: f64 = self.sailings.iter().map(|s| s.comp_value).sum();
        let count = self.sailings.len();

        let max_sailing = self
            .sailings
            .iter()
            .fold(first, |max, s| if s.comp_value > max.comp_value { s } else { max });
        let min_value = self.sailings.iter().map(|s| s.comp_value).fold(f64::INFINITY, f64::min);

        let sample_cruises = sorted_by_value(&self.sailings)
            .into_iter()
            .take(sample_size)
            .map(|s| SampleSailing {
                ship_name: s.ship.clone(),
                sailing_date: s.sailing_date.clone(),
                normalized_cabin_type: s.normalized_cabin_type,
                comp_value: s.comp_value,
            })
            .collect();

        let max_sailing_details = MaxSailingDetails {
            ship: max_sailing.ship.clone(),
            sailing_date: max_sailing.sailing_date.clone(),
            room_type: max_sailing.room_type.clone(),
            itinerary: max_sailing.itinerary.clone(),
        };
        let max_value = max_sailing.comp_value;

        Some(RankingEntry {
            offer_code: self.offer_code,
            offer_name: self.offer_name,
            num_sailings: count,
            total_comp_value: total,
            avg_comp_value: total / count as f64,
            min_sailing_value: min_value,
            max_sailing_value: max_value,
            earliest_expiry: self.earliest_expiry,
            sample_cruises,
            max_sailing_details,
            sailings: self.sailings,
        })
    }
}

/// Sailings in descending comp value, ties keep their original order
pub fn sorted_by_value(sailings: &[ValuedSailing]) -> Vec<&ValuedSailing> {
    let mut sorted: Vec<&ValuedSailing> = sailings.iter().collect();
    sorted.sort_by(|a, b| b.comp_value.partial_cmp(&a.comp_value).unwrap_or(Ordering::Equal));
    sorted
}

/// Groups valued sailings by offer code and ranks the groups two ways
pub struct RankingAggregator {
    resolver: ValueResolver,
    matcher: OfferMatcher,
    options: RankingOptions,
}

impl RankingAggregator {
    pub fn new(resolver: ValueResolver, matcher: OfferMatcher, options: RankingOptions) -> Self {
        Self { resolver, matcher, options }
    }

    pub fn resolver(&self) -> &ValueResolver {
        &self.resolver
    }

    pub fn options(&self) -> RankingOptions {
        self.options
    }

    /// Build one entry per offer code with at least one valued sailing,
    /// in order of first contribution.
    ///
    /// Matched cruises are valued with the embedded/cruise steps only;
    /// offers with no matching cruise use the embedded/text steps. Within
    /// one code every cruise contributes at most once.
    pub fn group(&self, offers: &[CasinoOffer], cruises: &[Cruise]) -> Vec<RankingEntry> {
        let mut groups: Vec<OfferGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for offer in offers {
            let code = offer.code();
            if code.is_empty() {
                tracing::debug!(offer_id = %offer.id, "skipping offer without code");
                continue;
            }

            let matched: Vec<(usize, &Cruise)> = cruises
                .iter()
                .enumerate()
                .filter(|(_, cruise)| self.matcher.matches(offer, cruise))
                .collect();

            if matched.is_empty() {
                let valuation = self.resolver.resolve_with(offer, None, UNMATCHED_CHAIN);
                if !valuation.is_valued() {
                    tracing::debug!(offer_code = code, "skipping offer with no data to calculate value");
                    continue;
                }
                let group = group_for(&mut groups, &mut index, offer);
                group.sailings.push(unmatched_sailing(offer, &valuation));
                group.track_expiry(offer.expiry_candidate());
                tracing::debug!(
                    offer_code = code,
                    comp_value = valuation.comp_value,
                    source = valuation.method.as_str(),
                    "added offer without matching cruise"
                );
                continue;
            }

            let mut added = false;
            for (position, cruise) in matched {
                let valuation = self.resolver.resolve_with(offer, Some(cruise), MATCHED_CHAIN);
                if !valuation.is_valued() {
                    continue;
                }

                let group = group_for(&mut groups, &mut index, offer);
                if !group.seen_cruises.insert(CruiseKey::of(position, cruise)) {
                    tracing::debug!(offer_code = code, cruise_id = %cruise.id, "cruise already counted for code");
                    continue;
                }
                group.sailings.push(matched_sailing(offer, cruise, &valuation));
                group.track_expiry(
                    offer.expiry_candidate().or(cruise.offer_expiration_date.as_deref()),
                );
                added = true;
            }

            if !added {
                tracing::debug!(offer_code = code, "matching cruises but no calculable value");
            }
        }

        groups
            .into_iter()
            .filter_map(|g| g.into_entry(self.options.sample_size))
            .collect()
    }

    /// Entries by summed comp value, descending; ties keep entry order
    pub fn by_overall_strength(entries: &[RankingEntry]) -> Vec<&RankingEntry> {
        let mut sorted: Vec<&RankingEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.total_comp_value.partial_cmp(&a.total_comp_value).unwrap_or(Ordering::Equal)
        });
        sorted
    }

    /// Entries by best single sailing, descending; ties keep entry order
    pub fn by_jackpot(entries: &[RankingEntry]) -> Vec<&RankingEntry> {
        let mut sorted: Vec<&RankingEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.max_sailing_value.partial_cmp(&a.max_sailing_value).unwrap_or(Ordering::Equal)
        });
        sorted
    }

    /// Top-N rankings over all offers
    pub fn rank(&self, offers: &[CasinoOffer], cruises: &[Cruise], generated_at: DateTime<Utc>) -> OfferRankings {
        let entries = self.group(offers, cruises);
        let limit = self.options.limit;

        let overall_strength: Vec<RankingEntry> = Self::by_overall_strength(&entries)
            .into_iter()
            .take(limit)
            .cloned()
            .collect();
        let single_sailing_jackpot: Vec<RankingEntry> = Self::by_jackpot(&entries)
            .into_iter()
            .take(limit)
            .cloned()
            .collect();

        let total_sailings: usize = entries.iter().map(|e| e.num_sailings).sum();

        tracing::info!(
            offers_fetched = offers.len(),
            cruises_fetched = cruises.len(),
            total_offers = entries.len(),
            total_sailings,
            "rankings calculated"
        );

        OfferRankings {
            overall_strength,
            single_sailing_jackpot,
            total_offers: entries.len(),
            total_sailings,
            generated_at,
        }
    }
}

fn group_for<'g>(
    groups: &'g mut Vec<OfferGroup>,
    index: &mut HashMap<String, usize>,
    offer: &CasinoOffer,
) -> &'g mut OfferGroup {
    let position = *index.entry(offer.code().to_string()).or_insert_with(|| {
        groups.push(OfferGroup::new(offer));
        groups.len() - 1
    });
    &mut groups[position]
}

fn first_filled<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>, default: &str) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|c| !c.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn cabin_label(valuation: &ResolvedValuation) -> Option<String> {
    valuation.normalized_cabin_type.map(|c| c.to_string())
}

fn matched_sailing(offer: &CasinoOffer, cruise: &Cruise, valuation: &ResolvedValuation) -> ValuedSailing {
    let cabin = cabin_label(valuation);
    ValuedSailing {
        offer_id: offer.id.clone(),
        cruise_id: Some(cruise.id.clone()),
        ship: first_filled([Some(cruise.ship.as_str()), offer.ship_name.as_deref()], "Unknown"),
        sailing_date: first_filled(
            [Some(cruise.departure_date.as_str()), offer.sailing_date.as_deref()],
            "Unknown",
        ),
        room_type: first_filled(
            [offer.room_type.as_deref(), cruise.cabin_type.as_deref(), cabin.as_deref()],
            "Unknown",
        ),
        normalized_cabin_type: valuation.normalized_cabin_type,
        itinerary: first_filled([cruise.itinerary_label(), offer.itinerary.as_deref()], "Unknown"),
        comp_value: valuation.comp_value,
        per_person_price: valuation.per_person_price,
        comped_shares: valuation.comped_shares,
        coverage_fraction: valuation.coverage_fraction,
        method: valuation.method,
    }
}

fn unmatched_sailing(offer: &CasinoOffer, valuation: &ResolvedValuation) -> ValuedSailing {
    let cabin = cabin_label(valuation);
    ValuedSailing {
        offer_id: offer.id.clone(),
        cruise_id: None,
        ship: first_filled([offer.ship_name.as_deref()], "Multiple Ships"),
        sailing_date: first_filled([offer.sailing_date.as_deref(), Some(offer.expires.as_str())], "Unknown"),
        room_type: first_filled([offer.room_type.as_deref(), cabin.as_deref()], "Unknown"),
        normalized_cabin_type: valuation.normalized_cabin_type,
        itinerary: first_filled([offer.itinerary.as_deref()], "Multiple Itineraries"),
        comp_value: valuation.comp_value,
        per_person_price: valuation.per_person_price,
        comped_shares: valuation.comped_shares,
        coverage_fraction: valuation.coverage_fraction,
        method: valuation.method,
    }
}
