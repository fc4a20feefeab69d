//! Price-check orchestration.
//!
//! Sequences the three upstream lookups (reservation → ticket → price
//! quotes), classifies failure at each step into a flat status taxonomy,
//! and applies the fare comparator. The chain is strictly sequential
//! because each step consumes the previous step's output; there is no
//! shared mutable state across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::LookupError;
use crate::fares::{FarePrice, TicketFare, lower_fares};
use crate::itinerary::{FlightSegment, parse_itinerary};

/// Body the reservation gateway returns for an unknown record locator.
pub const RESERVATION_NOT_FOUND: &str = "PNR NOT FOUND";

#[async_trait]
pub trait ReservationLookup: Send + Sync {
    /// Fetch the raw reservation printout for a record locator.
    async fn fetch_reservation(&self, pnr: &str) -> Result<String, LookupError>;
}

#[async_trait]
pub trait TicketLookup: Send + Sync {
    /// Fetch the ticket record for a 13-digit ticket number.
    async fn fetch_ticket(&self, ticket_number: &str) -> Result<Value, LookupError>;
}

#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Fetch current quotes for the given flight segments.
    async fn fetch_prices(&self, segments: &[SegmentQuery]) -> Result<Value, LookupError>;
}

/// Per-segment projection sent to the price feed: one entry per itinerary
/// segment, in itinerary order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentQuery {
    pub flight_number: String,
    pub departure_date: String,
    pub origin: String,
    pub destination: String,
}

impl From<&FlightSegment> for SegmentQuery {
    fn from(segment: &FlightSegment) -> Self {
        Self {
            flight_number: segment.flight_number.clone(),
            departure_date: segment.departure_date.clone(),
            origin: segment.origin.clone(),
            destination: segment.destination.clone(),
        }
    }
}

/// Outcome of one price check. Every failure mode maps to exactly one
/// status; callers never see a raw error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Success,
    PnrNotFound,
    ErrorPnrRequest,
    InvalidPnrParse,
    ErrorTicketsRequest,
    ErrorPriceRequest,
    ErrorPriceCompare,
}

/// The result object rendered to the caller. `lower_prices` is present only
/// on success and may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCheckReport {
    pub pnr: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_prices: Option<Vec<FarePrice>>,
}

/// Runs the reservation → ticket → price chain and the fare comparison.
///
/// Nothing is retried here; retry policy belongs to the caller. Timeouts
/// are the lookups' concern and surface as ordinary lookup failures.
pub struct PriceChecker<R, T, P> {
    reservations: R,
    tickets: T,
    prices: P,
}

impl<R, T, P> PriceChecker<R, T, P>
where
    R: ReservationLookup,
    T: TicketLookup,
    P: PriceLookup,
{
    pub fn new(reservations: R, tickets: T, prices: P) -> Self {
        Self {
            reservations,
            tickets,
            prices,
        }
    }

    /// Check one record locator for price drops.
    pub async fn check(&self, pnr: &str) -> PriceCheckReport {
        info!("price check for {pnr}");
        match self.run(pnr).await {
            Ok(lower_prices) => PriceCheckReport {
                pnr: pnr.to_string(),
                status: CheckStatus::Success,
                lower_prices: Some(lower_prices),
            },
            Err(status) => PriceCheckReport {
                pnr: pnr.to_string(),
                status,
                lower_prices: None,
            },
        }
    }

    async fn run(&self, pnr: &str) -> Result<Vec<FarePrice>, CheckStatus> {
        let dump = self.reservations.fetch_reservation(pnr).await.map_err(|e| {
            warn!("reservation lookup for {pnr} failed: {e}");
            CheckStatus::ErrorPnrRequest
        })?;

        if dump == RESERVATION_NOT_FOUND {
            return Err(CheckStatus::PnrNotFound);
        }

        let itinerary = parse_itinerary(&dump).map_err(|e| {
            warn!("reservation text for {pnr} did not parse: {e}");
            CheckStatus::InvalidPnrParse
        })?;

        let ticket_body = self
            .tickets
            .fetch_ticket(&itinerary.ticket_number)
            .await
            .map_err(|e| {
                warn!("ticket lookup for {} failed: {e}", itinerary.ticket_number);
                CheckStatus::ErrorTicketsRequest
            })?;

        let queries: Vec<SegmentQuery> = itinerary.segments.iter().map(SegmentQuery::from).collect();

        let price_body = self.prices.fetch_prices(&queries).await.map_err(|e| {
            warn!("price lookup for {pnr} failed: {e}");
            CheckStatus::ErrorPriceRequest
        })?;

        // The feeds only have to be JSON at fetch time; the fare fields are
        // validated here, on projection.
        let ticket: TicketFare = serde_json::from_value(ticket_body).map_err(|e| {
            warn!("ticket record for {pnr} is missing fare fields: {e}");
            CheckStatus::ErrorPriceCompare
        })?;
        let quotes: Vec<FarePrice> = serde_json::from_value(price_body).map_err(|e| {
            warn!("price list for {pnr} is malformed: {e}");
            CheckStatus::ErrorPriceCompare
        })?;

        Ok(lower_fares(&ticket, quotes))
    }
}
