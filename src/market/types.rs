//! Market leg types
//!
//! Each market family is a closed variant carrying only the subtypes valid
//! for it, so a `TOTALS` leg with a `HOME` side cannot be constructed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque match identifier owned by the market-data collaborator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A leg that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLegError {
    /// Market family not recognised
    #[error("unknown market type: {0}")]
    UnknownMarketType(String),
    /// Subtype not valid for the market family
    #[error("subtype {subtype} is not valid for {market_type}")]
    InvalidSubtype {
        market_type: MarketType,
        subtype: String,
    },
    /// Line-based market without a line
    #[error("{0} market requires a line")]
    MissingLine(MarketType),
    /// Line must be a positive threshold
    #[error("invalid line: {0}")]
    InvalidLine(Decimal),
    /// Neither a best price nor any book price
    #[error("leg has no price")]
    NoPrice,
    /// Decimal odds must be strictly above 1.0
    #[error("decimal odds must exceed 1.0, got {0}")]
    OddsNotAboveOne(Decimal),
    /// Consensus probability must lie in (0, 1)
    #[error("consensus probability must be in (0, 1), got {0}")]
    ProbabilityOutOfRange(Decimal),
    /// No consensus probability supplied
    #[error("leg has no consensus probability")]
    MissingProbability,
    /// Record could not be read as a leg at all
    #[error("malformed leg record: {0}")]
    Malformed(String),
}

/// Market family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketType {
    /// Full-time result
    #[serde(rename = "1X2")]
    MatchResult,
    /// Total goals over/under a line
    #[serde(rename = "TOTALS")]
    Totals,
    /// Both teams to score
    #[serde(rename = "BTTS")]
    BothTeamsToScore,
    /// Draw no bet
    #[serde(rename = "DNB")]
    DrawNoBet,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::MatchResult => "1X2",
            MarketType::Totals => "TOTALS",
            MarketType::BothTeamsToScore => "BTTS",
            MarketType::DrawNoBet => "DNB",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = InvalidLegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1X2" | "MATCH_RESULT" => Ok(MarketType::MatchResult),
            "TOTALS" | "OVER_UNDER" => Ok(MarketType::Totals),
            "BTTS" => Ok(MarketType::BothTeamsToScore),
            "DNB" | "DRAW_NO_BET" => Ok(MarketType::DrawNoBet),
            _ => Err(InvalidLegError::UnknownMarketType(s.to_string())),
        }
    }
}

/// Full-time result outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreeWay {
    Home,
    Draw,
    Away,
}

impl ThreeWay {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreeWay::Home => "HOME",
            ThreeWay::Draw => "DRAW",
            ThreeWay::Away => "AWAY",
        }
    }
}

/// Totals side
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverUnder {
    Over,
    Under,
}

/// Binary proposition side
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

/// Two-way side with the draw refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HomeAway {
    Home,
    Away,
}

/// One tradable outcome within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Market {
    MatchResult(ThreeWay),
    Totals { side: OverUnder, line: Decimal },
    BothTeamsToScore(YesNo),
    DrawNoBet(HomeAway),
}

impl Market {
    /// Build a market from the flat catalog representation
    ///
    /// `line` is only meaningful for totals and is ignored elsewhere.
    pub fn from_parts(
        market_type: &str,
        subtype: &str,
        line: Option<Decimal>,
    ) -> Result<Self, InvalidLegError> {
        let market_type = MarketType::from_str(market_type)?;
        let normalized = subtype.trim().to_ascii_uppercase();
        let invalid = || InvalidLegError::InvalidSubtype {
            market_type,
            subtype: subtype.to_string(),
        };

        match market_type {
            MarketType::MatchResult => match normalized.as_str() {
                "HOME" | "1" => Ok(Market::MatchResult(ThreeWay::Home)),
                "DRAW" | "X" => Ok(Market::MatchResult(ThreeWay::Draw)),
                "AWAY" | "2" => Ok(Market::MatchResult(ThreeWay::Away)),
                _ => Err(invalid()),
            },
            MarketType::Totals => {
                let side = match normalized.as_str() {
                    "OVER" => OverUnder::Over,
                    "UNDER" => OverUnder::Under,
                    _ => return Err(invalid()),
                };
                let line = line.ok_or(InvalidLegError::MissingLine(market_type))?;
                if line <= Decimal::ZERO {
                    return Err(InvalidLegError::InvalidLine(line));
                }
                Ok(Market::Totals {
                    side,
                    line: line.normalize(),
                })
            }
            MarketType::BothTeamsToScore => match normalized.as_str() {
                "YES" => Ok(Market::BothTeamsToScore(YesNo::Yes)),
                "NO" => Ok(Market::BothTeamsToScore(YesNo::No)),
                _ => Err(invalid()),
            },
            MarketType::DrawNoBet => match normalized.as_str() {
                "HOME" => Ok(Market::DrawNoBet(HomeAway::Home)),
                "AWAY" => Ok(Market::DrawNoBet(HomeAway::Away)),
                _ => Err(invalid()),
            },
        }
    }

    pub fn market_type(&self) -> MarketType {
        match self {
            Market::MatchResult(_) => MarketType::MatchResult,
            Market::Totals { .. } => MarketType::Totals,
            Market::BothTeamsToScore(_) => MarketType::BothTeamsToScore,
            Market::DrawNoBet(_) => MarketType::DrawNoBet,
        }
    }

    pub fn subtype(&self) -> &'static str {
        match self {
            Market::MatchResult(outcome) => outcome.as_str(),
            Market::Totals { side, .. } => match side {
                OverUnder::Over => "OVER",
                OverUnder::Under => "UNDER",
            },
            Market::BothTeamsToScore(side) => match side {
                YesNo::Yes => "YES",
                YesNo::No => "NO",
            },
            Market::DrawNoBet(side) => match side {
                HomeAway::Home => "HOME",
                HomeAway::Away => "AWAY",
            },
        }
    }

    pub fn line(&self) -> Option<Decimal> {
        match self {
            Market::Totals { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => write!(f, "{} {} {}", self.market_type(), self.subtype(), line),
            None => write!(f, "{} {}", self.market_type(), self.subtype()),
        }
    }
}

/// Price quoted by a single bookmaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookOdds {
    pub bookmaker: String,
    pub decimal_odds: Decimal,
}

/// Identity of a leg: match plus fully-qualified market
///
/// Two legs with equal keys describe the same bet regardless of price.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LegKey {
    pub match_id: MatchId,
    pub market: Market,
}

/// Flat catalog record as supplied by the market-data collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegRecord {
    /// May be omitted when the record is nested under its match
    #[serde(default)]
    pub match_id: String,
    pub market_type: String,
    pub market_subtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Decimal>,
    #[serde(default)]
    pub consensus_prob: Option<Decimal>,
    /// Best available price; derived from `book_odds` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_odds: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub book_odds: Vec<BookOdds>,
    /// Upstream edge figure; never trusted, always recomputed
    #[serde(default, skip_serializing)]
    pub edge: Option<Decimal>,
}

/// One candidate leg for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "LegRecord", try_from = "LegRecord")]
pub struct MarketLeg {
    pub match_id: MatchId,
    pub market: Market,
    /// Model-estimated true probability, independent of the price
    pub consensus_prob: Decimal,
    /// Best available decimal price
    pub decimal_odds: Decimal,
    pub book_odds: Vec<BookOdds>,
}

impl MarketLeg {
    /// Create a leg priced at a single best price
    pub fn new(
        match_id: impl Into<MatchId>,
        market: Market,
        consensus_prob: Decimal,
        decimal_odds: Decimal,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            market,
            consensus_prob,
            decimal_odds,
            book_odds: Vec::new(),
        }
    }

    /// Attach per-book prices
    pub fn with_book_odds(mut self, book_odds: Vec<BookOdds>) -> Self {
        self.book_odds = book_odds;
        self
    }

    pub fn market_type(&self) -> MarketType {
        self.market.market_type()
    }

    pub fn key(&self) -> LegKey {
        LegKey {
            match_id: self.match_id.clone(),
            market: self.market,
        }
    }
}

impl TryFrom<LegRecord> for MarketLeg {
    type Error = InvalidLegError;

    fn try_from(record: LegRecord) -> Result<Self, Self::Error> {
        let market = Market::from_parts(&record.market_type, &record.market_subtype, record.line)?;
        let consensus_prob = record
            .consensus_prob
            .ok_or(InvalidLegError::MissingProbability)?;
        let decimal_odds = match record.decimal_odds {
            Some(odds) => odds,
            None => record
                .book_odds
                .iter()
                .map(|b| b.decimal_odds)
                .max()
                .ok_or(InvalidLegError::NoPrice)?,
        };

        Ok(Self {
            match_id: MatchId::from(record.match_id),
            market,
            consensus_prob,
            decimal_odds,
            book_odds: record.book_odds,
        })
    }
}

impl From<MarketLeg> for LegRecord {
    fn from(leg: MarketLeg) -> Self {
        Self {
            match_id: leg.match_id.0,
            market_type: leg.market.market_type().as_str().to_string(),
            market_subtype: leg.market.subtype().to_string(),
            line: leg.market.line(),
            consensus_prob: Some(leg.consensus_prob),
            decimal_odds: Some(leg.decimal_odds),
            book_odds: leg.book_odds,
            edge: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(market_type: &str, subtype: &str, line: Option<Decimal>) -> LegRecord {
        LegRecord {
            match_id: "M1".to_string(),
            market_type: market_type.to_string(),
            market_subtype: subtype.to_string(),
            line,
            consensus_prob: Some(dec!(0.55)),
            decimal_odds: Some(dec!(2.00)),
            book_odds: Vec::new(),
            edge: Some(dec!(0.99)),
        }
    }

    #[test]
    fn test_parse_match_result() {
        let market = Market::from_parts("1X2", "home", None).unwrap();
        assert_eq!(market, Market::MatchResult(ThreeWay::Home));
        assert_eq!(market.market_type(), MarketType::MatchResult);
        assert_eq!(market.subtype(), "HOME");
        assert!(market.line().is_none());
    }

    #[test]
    fn test_parse_totals_requires_line() {
        let err = Market::from_parts("TOTALS", "OVER", None).unwrap_err();
        assert_eq!(err, InvalidLegError::MissingLine(MarketType::Totals));

        let market = Market::from_parts("TOTALS", "OVER", Some(dec!(2.50))).unwrap();
        assert_eq!(market.line(), Some(dec!(2.5)));
        assert_eq!(market.to_string(), "TOTALS OVER 2.5");
    }

    #[test]
    fn test_totals_rejects_non_positive_line() {
        let err = Market::from_parts("TOTALS", "UNDER", Some(dec!(0))).unwrap_err();
        assert!(matches!(err, InvalidLegError::InvalidLine(_)));
    }

    #[test]
    fn test_subtype_must_match_type() {
        let err = Market::from_parts("TOTALS", "HOME", Some(dec!(2.5))).unwrap_err();
        assert!(matches!(
            err,
            InvalidLegError::InvalidSubtype {
                market_type: MarketType::Totals,
                ..
            }
        ));

        let err = Market::from_parts("DNB", "DRAW", None).unwrap_err();
        assert!(matches!(err, InvalidLegError::InvalidSubtype { .. }));
    }

    #[test]
    fn test_unknown_market_type() {
        let err = Market::from_parts("CORNERS", "OVER", Some(dec!(9.5))).unwrap_err();
        assert_eq!(err, InvalidLegError::UnknownMarketType("CORNERS".to_string()));
    }

    #[test]
    fn test_equal_lines_produce_equal_keys() {
        let a = Market::from_parts("TOTALS", "OVER", Some(dec!(2.5))).unwrap();
        let b = Market::from_parts("TOTALS", "OVER", Some(dec!(2.50))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_conversion_ignores_stale_edge() {
        let leg = MarketLeg::try_from(record("1X2", "HOME", None)).unwrap();
        assert_eq!(leg.match_id, MatchId::from("M1"));
        assert_eq!(leg.decimal_odds, dec!(2.00));
        let back = LegRecord::from(leg);
        assert!(back.edge.is_none());
    }

    #[test]
    fn test_best_book_price_used_when_odds_missing() {
        let mut rec = record("BTTS", "YES", None);
        rec.decimal_odds = None;
        rec.book_odds = vec![
            BookOdds {
                bookmaker: "alpha".to_string(),
                decimal_odds: dec!(1.85),
            },
            BookOdds {
                bookmaker: "beta".to_string(),
                decimal_odds: dec!(1.92),
            },
        ];
        let leg = MarketLeg::try_from(rec).unwrap();
        assert_eq!(leg.decimal_odds, dec!(1.92));
        assert_eq!(leg.book_odds.len(), 2);
    }

    #[test]
    fn test_leg_without_any_price_rejected() {
        let mut rec = record("BTTS", "NO", None);
        rec.decimal_odds = None;
        assert_eq!(MarketLeg::try_from(rec).unwrap_err(), InvalidLegError::NoPrice);
    }

    #[test]
    fn test_leg_without_probability_rejected() {
        let mut rec = record("1X2", "AWAY", None);
        rec.consensus_prob = None;
        assert_eq!(
            MarketLeg::try_from(rec).unwrap_err(),
            InvalidLegError::MissingProbability
        );
    }

    #[test]
    fn test_leg_json_shape_is_flat() {
        let leg = MarketLeg::new(
            "M7",
            Market::Totals {
                side: OverUnder::Under,
                line: dec!(3.5),
            },
            dec!(0.6),
            dec!(1.8),
        );
        let json = serde_json::to_value(&leg).unwrap();
        assert_eq!(json["match_id"], "M7");
        assert_eq!(json["market_type"], "TOTALS");
        assert_eq!(json["market_subtype"], "UNDER");

        let parsed: MarketLeg = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, leg);
    }
}
