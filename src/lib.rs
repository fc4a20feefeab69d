//! `Farewatch` - airline reservation price-drop checking
//!
//! This library parses raw reservation printouts ("PNR dumps") into typed
//! itineraries and orchestrates the reservation, ticket and price lookups
//! to find current fares cheaper than the one already ticketed.

pub mod config;
pub mod error;
pub mod fares;
pub mod itinerary;
pub mod pipeline;
pub mod upstream;

// Re-export core types for public API
pub use config::FarewatchConfig;
pub use error::{LookupError, ParseError};
pub use fares::{FarePrice, TicketFare, lower_fares};
pub use itinerary::{FlightSegment, Itinerary, parse_itinerary};
pub use pipeline::{
    CheckStatus, PriceCheckReport, PriceChecker, PriceLookup, RESERVATION_NOT_FOUND,
    ReservationLookup, SegmentQuery, TicketLookup,
};
pub use upstream::UpstreamClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
