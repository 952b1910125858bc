use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a movie sits in the user's collection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovieStatus {
    /// Want to watch
    #[default]
    Watchlist,
    /// Already seen
    Watched,
}

impl MovieStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MovieStatus::Watchlist => "WATCHLIST",
            MovieStatus::Watched => "WATCHED",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watchlist" => Ok(MovieStatus::Watchlist),
            "watched" => Ok(MovieStatus::Watched),
            other => Err(format!("Invalid status: {}. Use 'watchlist' or 'watched'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&MovieStatus::Watchlist).unwrap(), "\"WATCHLIST\"");
        assert_eq!(serde_json::from_str::<MovieStatus>("\"WATCHED\"").unwrap(), MovieStatus::Watched);
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("Watched".parse::<MovieStatus>().unwrap(), MovieStatus::Watched);
        assert_eq!("WATCHLIST".parse::<MovieStatus>().unwrap(), MovieStatus::Watchlist);
        assert!("dropped".parse::<MovieStatus>().is_err());
    }
}
