//! Indicator range filters
//!
//! The filter state is a fixed set of four indicator ranges. Every edit
//! produces a new `FilterState`; nothing is mutated in place.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Technical indicators the backend can filter on, in query order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "williamsR")]
    WilliamsR,
    #[serde(rename = "emaWilliamsR")]
    EmaWilliamsR,
    #[serde(rename = "rsi14")]
    Rsi14,
    #[serde(rename = "rsi21")]
    Rsi21,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::WilliamsR,
        Indicator::EmaWilliamsR,
        Indicator::Rsi14,
        Indicator::Rsi21,
    ];

    /// Wire key used in query parameter names
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::WilliamsR => "williamsR",
            Indicator::EmaWilliamsR => "emaWilliamsR",
            Indicator::Rsi14 => "rsi14",
            Indicator::Rsi21 => "rsi21",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::WilliamsR => "Williams %R",
            Indicator::EmaWilliamsR => "EMA(13) Williams %R",
            Indicator::Rsi14 => "RSI 14",
            Indicator::Rsi21 => "RSI 21",
        }
    }

    /// Nominal value range shown to the user. Not enforced.
    pub fn advisory_range(&self) -> (f64, f64) {
        match self {
            Indicator::WilliamsR => (-100.0, 0.0),
            Indicator::EmaWilliamsR => (-100.0, 100.0),
            Indicator::Rsi14 | Indicator::Rsi21 => (0.0, 100.0),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Indicator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Indicator::ALL
            .into_iter()
            .find(|i| i.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown indicator '{}'", s)))
    }
}

/// Which end of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    From,
    To,
}

impl Bound {
    pub fn key(&self) -> &'static str {
        match self {
            Bound::From => "from",
            Bound::To => "to",
        }
    }
}

impl FromStr for Bound {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "from" => Ok(Bound::From),
            "to" => Ok(Bound::To),
            _ => Err(AppError::Validation(format!("Unknown bound '{}', expected from or to", s))),
        }
    }
}

/// Parse an input field name such as `williamsR_from`
pub fn parse_field(name: &str) -> Result<(Indicator, Bound)> {
    let (indicator, bound) = name
        .split_once('_')
        .ok_or_else(|| AppError::Validation(format!("Invalid filter field '{}'", name)))?;
    Ok((indicator.parse()?, bound.parse()?))
}

/// Input field name for an indicator bound
pub fn field_name(indicator: Indicator, bound: Bound) -> String {
    format!("{}_{}", indicator.key(), bound.key())
}

/// Optional lower and upper bound for one indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

impl IndicatorRange {
    pub fn get(&self, bound: Bound) -> Option<f64> {
        match bound {
            Bound::From => self.from,
            Bound::To => self.to,
        }
    }

    pub fn with(self, bound: Bound, value: Option<f64>) -> Self {
        match bound {
            Bound::From => Self { from: value, ..self },
            Bound::To => Self { to: value, ..self },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// The user's current from/to bounds per indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub williams_r: IndicatorRange,
    pub ema_williams_r: IndicatorRange,
    pub rsi14: IndicatorRange,
    pub rsi21: IndicatorRange,
}

impl FilterState {
    pub fn range(&self, indicator: Indicator) -> IndicatorRange {
        match indicator {
            Indicator::WilliamsR => self.williams_r,
            Indicator::EmaWilliamsR => self.ema_williams_r,
            Indicator::Rsi14 => self.rsi14,
            Indicator::Rsi21 => self.rsi21,
        }
    }

    /// Ranges in fixed indicator order
    pub fn ranges(&self) -> impl Iterator<Item = (Indicator, IndicatorRange)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.range(i)))
    }

    /// New state with one bound replaced; every other bound is carried over
    pub fn with_bound(&self, indicator: Indicator, bound: Bound, value: Option<f64>) -> Self {
        let mut next = *self;
        let slot = match indicator {
            Indicator::WilliamsR => &mut next.williams_r,
            Indicator::EmaWilliamsR => &mut next.ema_williams_r,
            Indicator::Rsi14 => &mut next.rsi14,
            Indicator::Rsi21 => &mut next.rsi21,
        };
        *slot = slot.with(bound, value);
        next
    }

    /// Apply raw input text. Empty text clears the bound; anything else must parse as a number.
    pub fn set_bound(&self, indicator: Indicator, bound: Bound, raw: &str) -> Result<Self> {
        let value = parse_bound_value(raw)?;
        Ok(self.with_bound(indicator, bound, value))
    }

    /// Same as `set_bound`, addressed by field name (`rsi14_to`)
    pub fn set_field(&self, field: &str, raw: &str) -> Result<Self> {
        let (indicator, bound) = parse_field(field)?;
        self.set_bound(indicator, bound, raw)
    }

    pub fn reset() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges().all(|(_, r)| r.is_empty())
    }
}

/// Parse filter input; the empty string means "no bound"
pub fn parse_bound_value(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("'{}' is not a number", raw)))
}
