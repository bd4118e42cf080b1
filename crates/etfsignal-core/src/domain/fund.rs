use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const FUND_CODE_LEN: usize = 6;

/// Validated fund code: six ASCII digits, stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FundId(String);

impl FundId {
    /// Parse a fund code, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFundCode);
        }

        let len = trimmed.chars().count();
        if len != FUND_CODE_LEN {
            return Err(ValidationError::FundCodeLength {
                len,
                expected: FUND_CODE_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_digit() {
                return Err(ValidationError::FundCodeInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exchange-prefixed symbol for the quote provider's wire format.
    ///
    /// `15`-prefixed codes list on Shenzhen (`sz`), everything else on
    /// Shanghai (`sh`).
    pub fn provider_symbol(&self) -> String {
        if self.0.starts_with("15") {
            format!("sz{}", self.0)
        } else {
            format!("sh{}", self.0)
        }
    }
}

impl Display for FundId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FundId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FundId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FundId> for String {
    fn from(value: FundId) -> Self {
        value.0
    }
}

/// One universe entry: a fund code plus the name shown downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSpec {
    pub id: FundId,
    pub name: String,
}

impl FundSpec {
    pub fn new(id: FundId, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            id.to_string()
        } else {
            name
        };
        Self { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_code() {
        let parsed = FundId::parse(" 510300 ").expect("code should parse");
        assert_eq!(parsed.as_str(), "510300");
    }

    #[test]
    fn rejects_wrong_length() {
        let err = FundId::parse("51030").expect_err("must fail");
        assert!(matches!(err, ValidationError::FundCodeLength { len: 5, .. }));
    }

    #[test]
    fn rejects_non_digits() {
        let err = FundId::parse("51O300").expect_err("must fail");
        assert!(matches!(err, ValidationError::FundCodeInvalidChar { ch: 'O', index: 2 }));
    }

    #[test]
    fn maps_exchange_prefix() {
        assert_eq!(
            FundId::parse("159915").expect("parse").provider_symbol(),
            "sz159915"
        );
        assert_eq!(
            FundId::parse("510300").expect("parse").provider_symbol(),
            "sh510300"
        );
    }

    #[test]
    fn blank_display_name_falls_back_to_code() {
        let spec = FundSpec::new(FundId::parse("510300").expect("parse"), "  ");
        assert_eq!(spec.name, "510300");
    }
}
