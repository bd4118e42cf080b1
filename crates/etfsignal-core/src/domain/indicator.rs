use serde::{Deserialize, Serialize};

/// Relation of the latest close to its 60-day moving average.
///
/// `Equal` only on an exact tie; `Unavailable` when fewer than 60 daily bars
/// exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaRelation {
    Above,
    Below,
    Equal,
    Unavailable,
}

impl MaRelation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::Equal => "equal",
            Self::Unavailable => "unavailable",
        }
    }
}

/// The relation flipped between the last two sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSignal {
    CrossUp,
    CrossDown,
}

impl CrossSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrossUp => "cross_up",
            Self::CrossDown => "cross_down",
        }
    }
}

/// Weekly MACD triple at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub dif: f64,
    pub dea: f64,
    /// 2 × (DIF − DEA); the sign drives the red/green classification
    /// downstream.
    pub histogram: f64,
}

/// The MACD histogram changed sign between the last two weekly bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramFlip {
    TurnedPositive,
    TurnedNegative,
}

impl HistogramFlip {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TurnedPositive => "turned_positive",
            Self::TurnedNegative => "turned_negative",
        }
    }
}

/// Everything the indicator engine derives for one fund on one date.
///
/// Absent fields mean the fund's history was too short, never that the
/// computation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub latest_close: Option<f64>,
    pub ma60: Option<f64>,
    pub ma_relation: MaRelation,
    pub ma_cross: Option<CrossSignal>,
    pub macd: Option<Macd>,
    pub macd_flip: Option<HistogramFlip>,
}

impl IndicatorResult {
    /// Result for a fund with no usable history at all.
    pub fn unavailable() -> Self {
        Self {
            latest_close: None,
            ma60: None,
            ma_relation: MaRelation::Unavailable,
            ma_cross: None,
            macd: None,
            macd_flip: None,
        }
    }
}
