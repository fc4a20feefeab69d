//! Fare models and the price-drop comparator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One quoted fare from the price feed.
///
/// `amount` is in minor currency units; the strict comparison in
/// [`lower_fares`] must never run on binary floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarePrice {
    pub class_of_service: String,
    pub amount: i64,
}

/// The currently ticketed fare.
///
/// Same shape as [`FarePrice`] plus whatever else the ticket record
/// carries; extra fields are preserved verbatim but never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketFare {
    pub class_of_service: String,
    pub amount: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Returns the quotes that undercut the ticketed fare.
///
/// A quote counts iff its class of service equals the ticket's
/// (case-sensitive) and its amount is strictly lower; an equal fare is not
/// a drop. Input order and duplicates are preserved, nothing is sorted.
pub fn lower_fares(ticket: &TicketFare, prices: Vec<FarePrice>) -> Vec<FarePrice> {
    prices
        .into_iter()
        .filter(|price| {
            price.class_of_service == ticket.class_of_service && price.amount < ticket.amount
        })
        .collect()
}
