use std::collections::BTreeMap;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use compass_catalog::Cruise;
use crate::expiry::{days_after, parse_offer_date, ExpiryManager, OfferStatus};
use crate::models::CasinoOffer;

static OFFER_CODE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\d{3}$").expect("valid code pattern")
});

pub const INVALID_CODE_ERROR: &str = "Invalid offer code format";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeValidation {
    pub id: String,
    pub offer_code: String,
    pub is_valid: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub results: Vec<CodeValidation>,
}

/// Check every offer code against the `YYMONnnn` format, e.g. `25NOV106`
pub fn validate_offer_codes(offers: &[CasinoOffer]) -> CodeValidationReport {
    let results: Vec<CodeValidation> = offers
        .iter()
        .map(|offer| {
            let is_valid = OFFER_CODE_FORMAT.is_match(&offer.offer_code);
            CodeValidation {
                id: offer.id.clone(),
                offer_code: offer.offer_code.clone(),
                is_valid,
                error: (!is_valid).then(|| INVALID_CODE_ERROR.to_string()),
            }
        })
        .collect();

    let valid = results.iter().filter(|r| r.is_valid).count();
    CodeValidationReport {
        total: results.len(),
        valid,
        invalid: results.len() - valid,
        results,
    }
}

/// Cruises per linked offer, keyed `<code>_<expiration>` when the cruise
/// records an offer expiration, else `<code>`.
pub fn linked_cruise_counts(cruises: &[Cruise]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cruise in cruises {
        let Some(code) = cruise.offer_code.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let key = match cruise.offer_expiration_date.as_deref().filter(|d| !d.is_empty()) {
            Some(expiration) => format!("{code}_{expiration}"),
            None => code.to_string(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalysis {
    pub offer_id: String,
    pub offer_code: String,
    pub offer_name: String,
    pub associated_cruises: usize,
    pub upcoming_cruises: usize,
    pub status: OfferStatus,
}

/// Summarizes how many cruises each offer is attached to
pub struct OfferAnalyzer {
    expiry: ExpiryManager,
    upcoming_window_days: i64,
}

impl OfferAnalyzer {
    pub fn new(expiry: ExpiryManager, upcoming_window_days: i64) -> Self {
        Self { expiry, upcoming_window_days }
    }

    /// Cruises are associated by trimmed, case-insensitive offer code or
    /// offer name. Upcoming ones depart within the window starting today.
    pub fn analyze(&self, offers: &[CasinoOffer], cruises: &[Cruise], today: NaiveDate) -> Vec<OfferAnalysis> {
        let window_end = days_after(today, self.upcoming_window_days);

        offers
            .iter()
            .map(|offer| {
                let code = normalize(Some(&offer.offer_code));
                let name = normalize(Some(&offer.offer_name));

                let associated: Vec<&Cruise> = cruises
                    .iter()
                    .filter(|cruise| {
                        let cruise_code = normalize(cruise.offer_code.as_deref());
                        let cruise_name = normalize(cruise.offer_name.as_deref());
                        (!code.is_empty() && cruise_code == code) || (!name.is_empty() && cruise_name == name)
                    })
                    .collect();

                let upcoming = associated
                    .iter()
                    .filter_map(|cruise| parse_offer_date(&cruise.departure_date))
                    .filter(|departure| *departure >= today && window_end.map_or(true, |end| *departure <= end))
                    .count();

                OfferAnalysis {
                    offer_id: offer.id.clone(),
                    offer_code: offer.offer_code.clone(),
                    offer_name: offer.offer_name.clone(),
                    associated_cruises: associated.len(),
                    upcoming_cruises: upcoming,
                    status: self.expiry.status(offer, today),
                }
            })
            .collect()
    }
}

impl Default for OfferAnalyzer {
    fn default() -> Self {
        Self::new(ExpiryManager::default(), 90)
    }
}

fn normalize(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}
