//! Reservation dump parsing.
//!
//! The reservation gateway returns a free-text printout ("PNR dump") in
//! which operators prefix itinerary-level lines with numbers (`1.`) and
//! flight segments with lowercase letters (`a.`, `b.`, ...). Each line is
//! classified on its own merits, so a numeric line in the middle of a
//! segment block is skipped without ending the scan.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Fields a segment line must split into.
const SEGMENT_FIELDS: usize = 7;

/// Length of a ticket number.
const TICKET_DIGITS: usize = 13;

/// One flight leg of an itinerary.
///
/// Every field is carried verbatim from the reservation dump;
/// `departure_date` stays a raw `DDMon` token such as `10OCT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub flight_number: String,
    pub departure_date: String,
    pub origin: String,
    pub destination: String,
    pub segment_status: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub fare_ladder: String,
}

/// A parsed reservation: the ticket number and its flight segments in the
/// order they appear in the dump. A ticketed reservation with no segment
/// lines parses to an empty segment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub ticket_number: String,
    pub segments: Vec<FlightSegment>,
}

#[derive(Debug, PartialEq, Eq)]
enum LineClass<'a> {
    /// A ticketing line; holds the 13-digit ticket number.
    Ticket(&'a str),
    /// A flight segment line; holds the text after the `x.` prefix.
    Segment(&'a str),
    Other,
}

/// Parse a reservation dump into a typed itinerary.
///
/// Fails with [`ParseError::NoTicketNumber`] when no ticketing line is
/// present (including for empty input) and with
/// [`ParseError::MalformedSegment`] when any segment line does not split
/// into exactly seven fields. There are no partial results: one bad segment
/// fails the whole parse.
pub fn parse_itinerary(text: &str) -> Result<Itinerary, ParseError> {
    let mut ticket_number: Option<&str> = None;
    let mut segments = Vec::new();

    for line in text.lines() {
        match classify_line(line) {
            LineClass::Ticket(number) => {
                // first ticketing line wins
                ticket_number.get_or_insert(number);
            }
            LineClass::Segment(body) => segments.push(parse_segment(body)?),
            LineClass::Other => {}
        }
    }

    let ticket_number = ticket_number.ok_or(ParseError::NoTicketNumber)?;

    Ok(Itinerary {
        ticket_number: ticket_number.to_string(),
        segments,
    })
}

fn classify_line(raw: &str) -> LineClass<'_> {
    let line = raw.trim();
    let bytes = line.as_bytes();

    // Segment lines start with a single lowercase letter and a period.
    // A digit prefix is an itinerary-level line, never a segment.
    if bytes.len() >= 2 && bytes[0].is_ascii_lowercase() && bytes[1] == b'.' {
        return LineClass::Segment(&line[2..]);
    }

    if let Some(number) = ticket_number(line) {
        return LineClass::Ticket(number);
    }

    LineClass::Other
}

/// Matches a ticketing line: a line number without a leading zero, the
/// literal marker `. AS `, then at least thirteen digits, of which the
/// first thirteen are the ticket number.
fn ticket_number(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    match bytes.first() {
        Some(b'1'..=b'9') => {}
        _ => return None,
    }

    let prefix_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let rest = line[prefix_len..].strip_prefix(". AS ")?;

    let has_number = rest.len() >= TICKET_DIGITS
        && rest.as_bytes()[..TICKET_DIGITS]
            .iter()
            .all(u8::is_ascii_digit);
    if !has_number {
        return None;
    }

    Some(&rest[..TICKET_DIGITS])
}

fn parse_segment(body: &str) -> Result<FlightSegment, ParseError> {
    let fields: Vec<&str> = body.split_whitespace().collect();
    if fields.len() != SEGMENT_FIELDS {
        return Err(ParseError::MalformedSegment {
            line: body.trim().to_string(),
            found: fields.len(),
            expected: SEGMENT_FIELDS,
        });
    }

    let (origin, destination) = split_city_pair(fields[2]);

    Ok(FlightSegment {
        flight_number: fields[0].to_string(),
        departure_date: fields[1].to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        segment_status: fields[3].to_string(),
        departure_time: fields[4].to_string(),
        arrival_time: fields[5].to_string(),
        fare_ladder: fields[6].to_string(),
    })
}

/// Splits a six-character origin-destination token after the third
/// character. Shorter tokens yield a truncated or empty destination rather
/// than an error, matching the permissive feed.
fn split_city_pair(token: &str) -> (&str, &str) {
    let cut = token
        .char_indices()
        .nth(3)
        .map_or(token.len(), |(idx, _)| idx);
    token.split_at(cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FULL_DUMP: &str = "
              RECLOC: ABC123
              FLIGHTS:
              1. AS 0277850344766
                  a. 487K 10OCT SEALAX HK1   250P  535P /DCAS*HJQTEX
                  b. 486T 18OCT LAXSEA HK1   230P  513P /DCAS*HJQTEX
                  c. 486T 18OCT LAXSEA HK1   230P  513P /DCAS*HJQTEX
        ";

    #[test]
    fn test_parse_full_dump() {
        let itinerary = parse_itinerary(FULL_DUMP).unwrap();

        assert_eq!(itinerary.ticket_number, "0277850344766");
        assert_eq!(itinerary.segments.len(), 3);

        let first = &itinerary.segments[0];
        assert_eq!(first.flight_number, "487K");
        assert_eq!(first.departure_date, "10OCT");
        assert_eq!(first.origin, "SEA");
        assert_eq!(first.destination, "LAX");
        assert_eq!(first.segment_status, "HK1");
        assert_eq!(first.departure_time, "250P");
        assert_eq!(first.arrival_time, "535P");
        assert_eq!(first.fare_ladder, "/DCAS*HJQTEX");

        assert_eq!(itinerary.segments[1].origin, "LAX");
        assert_eq!(itinerary.segments[1].destination, "SEA");
    }

    #[test]
    fn test_digit_prefixed_line_is_skipped_not_terminal() {
        let dump = "
              RECLOC: ABC123
              FLIGHTS:
              1. AS 0277850344766
                  a. 487K 10OCT SEALAX HK1   250P  535P /DCAS*HJQTEX
                  1. 486T 18OCT LAXSEA HK1   230P  513P /DCAS*HJQTEX
                  c. 486T 18OCT LAXSEA HK1   230P  513P /DCAS*HJQTEX
        ";
        let itinerary = parse_itinerary(dump).unwrap();

        // the numeric impostor is excluded, the segment after it still counts
        assert_eq!(itinerary.segments.len(), 2);
        assert_eq!(itinerary.segments[1].flight_number, "486T");
    }

    #[test]
    fn test_empty_text_fails() {
        assert_eq!(parse_itinerary(""), Err(ParseError::NoTicketNumber));
    }

    #[test]
    fn test_segments_without_ticket_line_fail() {
        let dump = "a. 487K 10OCT SEALAX HK1 250P 535P /DCAS*HJQTEX";
        assert_eq!(parse_itinerary(dump), Err(ParseError::NoTicketNumber));
    }

    #[test]
    fn test_ticket_without_segments_is_valid() {
        let itinerary = parse_itinerary("1. AS 0277850344766").unwrap();
        assert_eq!(itinerary.ticket_number, "0277850344766");
        assert!(itinerary.segments.is_empty());
    }

    #[test]
    fn test_first_ticket_line_wins() {
        let dump = "1. AS 0277850344766\n2. AS 9999999999999";
        let itinerary = parse_itinerary(dump).unwrap();
        assert_eq!(itinerary.ticket_number, "0277850344766");
    }

    #[test]
    fn test_attached_garbage_stays_in_fare_ladder() {
        let dump = "1. AS 0277850344766\na. 486T 18OCT LAXSEA HK1 230P 513P /DCAS*HJQTEX/E*l";
        let itinerary = parse_itinerary(dump).unwrap();
        assert_eq!(itinerary.segments[0].fare_ladder, "/DCAS*HJQTEX/E*l");
    }

    #[test]
    fn test_detached_garbage_is_fatal() {
        let dump = "1. AS 0277850344766\na. 486T 18OCT LAXSEA HK1 230P 513P /DCAS*HJQTEX /E*";
        let err = parse_itinerary(dump).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedSegment {
                line: "486T 18OCT LAXSEA HK1 230P 513P /DCAS*HJQTEX /E*".to_string(),
                found: 8,
                expected: 7,
            }
        );
    }

    #[test]
    fn test_short_segment_is_fatal() {
        let dump = "1. AS 0277850344766\na. 486T 18OCT LAXSEA HK1 230P 513P";
        assert!(matches!(
            parse_itinerary(dump),
            Err(ParseError::MalformedSegment { found: 6, .. })
        ));
    }

    #[test]
    fn test_one_bad_segment_fails_the_whole_parse() {
        let dump = "
              1. AS 0277850344766
                  a. 487K 10OCT SEALAX HK1 250P 535P /DCAS*HJQTEX
                  b. 486T 18OCT
        ";
        assert!(parse_itinerary(dump).is_err());
    }

    #[test]
    fn test_short_city_pair_token_is_permissive() {
        let dump = "1. AS 0277850344766\na. 487K 10OCT SEAL HK1 250P 535P /DC";
        let itinerary = parse_itinerary(dump).unwrap();
        assert_eq!(itinerary.segments[0].origin, "SEA");
        assert_eq!(itinerary.segments[0].destination, "L");

        let dump = "1. AS 0277850344766\na. 487K 10OCT SE HK1 250P 535P /DC";
        let itinerary = parse_itinerary(dump).unwrap();
        assert_eq!(itinerary.segments[0].origin, "SE");
        assert_eq!(itinerary.segments[0].destination, "");
    }

    #[rstest]
    #[case::segment("  a. 487K 10OCT SEALAX", LineClass::Segment(" 487K 10OCT SEALAX"))]
    #[case::ticket("1. AS 0277850344766", LineClass::Ticket("0277850344766"))]
    #[case::multi_digit_prefix("12. AS 0277850344766", LineClass::Ticket("0277850344766"))]
    #[case::digit_prefix_flight("1. 486T 18OCT LAXSEA HK1 230P 513P /DC", LineClass::Other)]
    #[case::uppercase_prefix("A. 486T 18OCT LAXSEA HK1 230P 513P /DC", LineClass::Other)]
    #[case::zero_prefix("0. AS 0277850344766", LineClass::Other)]
    #[case::short_ticket_number("1. AS 12345", LineClass::Other)]
    #[case::no_marker("1. XX 0277850344766", LineClass::Other)]
    #[case::blank("   ", LineClass::Other)]
    fn test_classify_line(#[case] line: &str, #[case] expected: LineClass<'_>) {
        assert_eq!(classify_line(line), expected);
    }

    #[test]
    fn test_overlong_ticket_number_takes_first_thirteen() {
        assert_eq!(
            classify_line("1. AS 02778503447669"),
            LineClass::Ticket("0277850344766")
        );
    }
}
