use anyhow::{bail, Result};
use std::fmt;

/// A score band used both by the benefit ladder and by report filters.
///
/// String forms: `<N`, `<=N`, `>N`, `>=N`, `N` (exact) and `N-M` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    LessThan(i64),
    LessEqual(i64),
    GreaterThan(i64),
    GreaterEqual(i64),
    Equal(i64),
    Between(i64, i64), // Inclusive range: N-M
}

impl Band {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(Band::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(Band::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(Band::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(Band::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low: i64 = parts[0].trim().parse()?;
                let high: i64 = parts[1].trim().parse()?;
                if low > high {
                    bail!("Empty band {}: lower bound exceeds upper bound", s)
                }
                Ok(Band::Between(low, high))
            } else {
                bail!("Invalid band format: {}", s)
            }
        } else {
            Ok(Band::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: i64) -> bool {
        match self {
            Band::LessThan(n) => value < *n,
            Band::LessEqual(n) => value <= *n,
            Band::GreaterThan(n) => value > *n,
            Band::GreaterEqual(n) => value >= *n,
            Band::Equal(n) => value == *n,
            Band::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::LessThan(n) => write!(f, "<{}", n),
            Band::LessEqual(n) => write!(f, "<={}", n),
            Band::GreaterThan(n) => write!(f, ">{}", n),
            Band::GreaterEqual(n) => write!(f, ">={}", n),
            Band::Equal(n) => write!(f, "{}", n),
            Band::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

impl std::str::FromStr for Band {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Band::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_band_less_than() {
        let band = Band::parse("<80").unwrap();
        assert!(band.matches(79));
        assert!(!band.matches(80));
        assert!(band.matches(-5));
    }

    #[test]
    fn test_parse_band_less_equal() {
        let band = Band::parse("<=210").unwrap();
        assert!(band.matches(210));
        assert!(!band.matches(211));
    }

    #[test]
    fn test_parse_band_greater_than() {
        let band = Band::parse(">241").unwrap();
        assert!(!band.matches(241));
        assert!(band.matches(242));
    }

    #[test]
    fn test_parse_band_greater_equal() {
        let band = Band::parse(">= 180").unwrap();
        assert!(!band.matches(179));
        assert!(band.matches(180));
        assert!(band.matches(300));
    }

    #[test]
    fn test_parse_band_equal() {
        let band = Band::parse("241").unwrap();
        assert!(band.matches(241));
        assert!(!band.matches(240));
    }

    #[test]
    fn test_parse_band_negative_equal() {
        let band = Band::parse("-5").unwrap();
        assert_eq!(band, Band::Equal(-5));
    }

    #[test]
    fn test_parse_band_between() {
        let band = Band::parse("211-240").unwrap();
        assert!(!band.matches(210));
        assert!(band.matches(211));
        assert!(band.matches(225));
        assert!(band.matches(240));
        assert!(!band.matches(241));
    }

    #[test]
    fn test_parse_band_rejects_inverted_range() {
        assert!(Band::parse("240-211").is_err());
    }

    #[test]
    fn test_parse_band_rejects_garbage() {
        assert!(Band::parse("high").is_err());
        assert!(Band::parse(">abc").is_err());
        assert!(Band::parse("1-2-3").is_err());
    }

    #[test]
    fn test_display_matches_parse_input() {
        for input in ["<80", "<=210", ">241", ">=180", "241", "211-240"] {
            assert_eq!(Band::parse(input).unwrap().to_string(), input);
        }
    }
}
