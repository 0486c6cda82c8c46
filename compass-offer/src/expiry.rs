use std::collections::HashMap;
use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::models::CasinoOffer;

/// Lifecycle status of an offer relative to a reference day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OfferStatus {
    Active,
    ExpiringSoon,
    Expired,
}

/// Parse the date formats offers arrive in: ISO dates, RFC 3339
/// timestamps and US `MM/DD/YYYY`.
pub fn parse_offer_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok())
}

/// `today` shifted by `days`, or `None` when that leaves the calendar range
pub(crate) fn days_after(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|offset| today.checked_add_signed(offset))
}

/// Classifies offers by expiry and filters the active set
#[derive(Debug, Clone)]
pub struct ExpiryManager {
    expiring_soon_days: i64,
}

impl ExpiryManager {
    pub fn new(expiring_soon_days: i64) -> Self {
        Self { expiring_soon_days }
    }

    /// Offers whose expiry cannot be parsed are treated as active
    pub fn status(&self, offer: &CasinoOffer, today: NaiveDate) -> OfferStatus {
        match parse_offer_date(&offer.expires) {
            Some(expiry) if expiry < today => OfferStatus::Expired,
            // Out-of-range windows have no upper bound
            Some(expiry) if days_after(today, self.expiring_soon_days).map_or(true, |end| expiry <= end) => {
                OfferStatus::ExpiringSoon
            }
            _ => OfferStatus::Active,
        }
    }

    pub fn is_active(&self, offer: &CasinoOffer, today: NaiveDate) -> bool {
        self.status(offer, today) != OfferStatus::Expired
    }

    /// Unexpired offers, one per code.
    ///
    /// Codes are compared upper-cased and trimmed; records without a code
    /// are keyed by name and expiry instead. When a key repeats, the record
    /// with the later parseable expiry replaces the earlier one.
    pub fn active_offers<'a>(&self, offers: &'a [CasinoOffer], today: NaiveDate) -> Vec<&'a CasinoOffer> {
        let mut unique: Vec<&'a CasinoOffer> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for offer in offers {
            if !self.is_active(offer, today) {
                tracing::debug!(offer_code = offer.code(), expires = %offer.expires, "filtered expired offer");
                continue;
            }

            let key = dedupe_key(offer);
            match index.get(&key) {
                None => {
                    index.insert(key, unique.len());
                    unique.push(offer);
                }
                Some(&position) => {
                    let previous = parse_offer_date(&unique[position].expires);
                    let current = parse_offer_date(&offer.expires);
                    let later = match (current, previous) {
                        (Some(cur), Some(prev)) => cur > prev,
                        (Some(_), None) => true,
                        _ => false,
                    };
                    if later {
                        unique[position] = offer;
                    }
                }
            }
        }

        tracing::info!(
            total = offers.len(),
            active_unique = unique.len(),
            "active unique offers"
        );
        unique
    }
}

impl Default for ExpiryManager {
    fn default() -> Self {
        Self::new(7)
    }
}

fn dedupe_key(offer: &CasinoOffer) -> String {
    let code = offer.code().to_uppercase();
    if code.is_empty() {
        format!("name:{}|exp:{}", offer.offer_name.trim().to_uppercase(), offer.expires)
    } else {
        code
    }
}
