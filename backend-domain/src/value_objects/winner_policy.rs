// What to do with a winner cell that names neither side

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousWinnerPolicy {
    #[default]
    DefaultToA,
    DefaultToB,
    Reject,
}

impl AmbiguousWinnerPolicy {
    /// Side credited with the win when the designator is unrecognized.
    /// `None` leaves the row without a winner so the importer rejects it.
    pub fn fallback(&self) -> Option<Side> {
        match self {
            AmbiguousWinnerPolicy::DefaultToA => Some(Side::A),
            AmbiguousWinnerPolicy::DefaultToB => Some(Side::B),
            AmbiguousWinnerPolicy::Reject => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmbiguousWinnerPolicy::DefaultToA => "default_to_a",
            AmbiguousWinnerPolicy::DefaultToB => "default_to_b",
            AmbiguousWinnerPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for AmbiguousWinnerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbiguousWinnerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "default_to_a" | "player1" => Ok(AmbiguousWinnerPolicy::DefaultToA),
            "b" | "default_to_b" | "player2" => Ok(AmbiguousWinnerPolicy::DefaultToB),
            "reject" => Ok(AmbiguousWinnerPolicy::Reject),
            other => Err(format!(
                "unknown winner policy '{}', expected a, b or reject",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("a".parse(), Ok(AmbiguousWinnerPolicy::DefaultToA));
        assert_eq!("Default_To_B".parse(), Ok(AmbiguousWinnerPolicy::DefaultToB));
        assert_eq!("reject".parse(), Ok(AmbiguousWinnerPolicy::Reject));
        assert!("coin-flip".parse::<AmbiguousWinnerPolicy>().is_err());
    }

    #[test]
    fn reject_has_no_fallback_side() {
        assert_eq!(AmbiguousWinnerPolicy::default().fallback(), Some(Side::A));
        assert_eq!(AmbiguousWinnerPolicy::Reject.fallback(), None);
    }
}
