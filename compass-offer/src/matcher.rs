use serde::{Deserialize, Serialize};
use compass_catalog::Cruise;
use crate::models::CasinoOffer;

/// How strictly ship names and dates are compared
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Trim and case-fold ship/date before comparing. Off by default:
    /// identity matching is plain string equality.
    pub normalize_identity: bool,
}

/// Associates an offer with the cruises it applies to
#[derive(Debug, Clone, Default)]
pub struct OfferMatcher {
    policy: MatchPolicy,
}

impl OfferMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// A cruise matches when it carries the offer's code (single field or
    /// list), or when the offer names a ship and sailing date that equal the
    /// cruise's ship and departure date.
    pub fn matches(&self, offer: &CasinoOffer, cruise: &Cruise) -> bool {
        let code = offer.code();
        if !code.is_empty() && cruise.carries_offer_code(code) {
            return true;
        }

        match offer.sailing_identity() {
            Some((ship, date)) => {
                self.same(ship, &cruise.ship) && self.same(date, &cruise.departure_date)
            }
            None => false,
        }
    }

    pub fn matching_cruises<'c>(&self, offer: &CasinoOffer, cruises: &'c [Cruise]) -> Vec<&'c Cruise> {
        cruises.iter().filter(|cruise| self.matches(offer, cruise)).collect()
    }

    fn same(&self, left: &str, right: &str) -> bool {
        if self.policy.normalize_identity {
            left.trim().to_lowercase() == right.trim().to_lowercase()
        } else {
            left == right
        }
    }
}
