//! Error types for hexroute
//!
//! Every failure the dashboard can surface to a user maps to one variant here.
//! None of them is fatal: the caller reports the message and keeps going.

use std::fmt;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Which side of the selection an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRole {
    Origin,
    Destination,
}

impl fmt::Display for SelectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionRole::Origin => write!(f, "origin"),
            SelectionRole::Destination => write!(f, "destination"),
        }
    }
}

/// Suggest the closest known identifier for a mistyped one
///
/// Candidates are the dataset's own option list. Returns `None` for an exact
/// match or when nothing is reasonably close.
pub fn suggest_correction(id: &str, candidates: &[String]) -> Option<String> {
    let needle = id.to_lowercase();
    let mut best: Option<(&String, f64)> = None;

    for candidate in candidates {
        let hay = candidate.to_lowercase();
        if hay == needle {
            return None;
        }

        // Jaro-Winkler favours shared prefixes, which is how cell codes are built
        let score = jaro_winkler(&needle, &hay).max(normalized_levenshtein(&needle, &hay));
        if score >= 0.8 && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate.clone())
}

/// Main error type for hexroute operations
#[derive(Debug)]
pub enum Error {
    /// The dataset could not be fetched or parsed
    DatasetLoadFailure(String),

    /// No feature carries the selected identifier
    SelectionNotFound {
        role: SelectionRole,
        id: String,
        suggestion: Option<String>,
    },

    /// The routing request failed or its response could not be understood
    RoutingNetworkFailure(String),

    /// The routing service answered with zero candidate routes
    RoutingEmptyResult,

    /// Invalid parameters or a missing precondition
    InvalidInput(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DatasetLoadFailure(msg) => {
                write!(f, "Dataset load failed: {}", msg)
            }
            Error::SelectionNotFound { role, id, suggestion: Some(s) } => {
                write!(f, "No cell found for {} '{}'. Did you mean '{}'?", role, id, s)
            }
            Error::SelectionNotFound { role, id, suggestion: None } => {
                write!(f, "No cell found for {} '{}'", role, id)
            }
            Error::RoutingNetworkFailure(msg) => {
                write!(f, "Routing request failed: {}", msg)
            }
            Error::RoutingEmptyResult => {
                write!(f, "No route returned between the selected cells")
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RoutingNetworkFailure(err.to_string())
    }
}

/// Convenience result type for hexroute operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> Vec<String> {
        vec![
            "891fb466257ffff".to_string(),
            "891fb466263ffff".to_string(),
            "891fb4662d7ffff".to_string(),
        ]
    }

    #[test]
    fn test_suggest_correction_single_typo() {
        assert_eq!(
            suggest_correction("891fb466257fff", &codes()),
            Some("891fb466257ffff".to_string())
        );
    }

    #[test]
    fn test_suggest_correction_exact_match() {
        assert_eq!(suggest_correction("891fb466263ffff", &codes()), None);
        assert_eq!(suggest_correction("891FB466263FFFF", &codes()), None);
    }

    #[test]
    fn test_suggest_correction_no_match() {
        assert_eq!(suggest_correction("zzz", &codes()), None);
        assert_eq!(suggest_correction("abc", &[]), None);
    }

    #[test]
    fn test_selection_not_found_message() {
        let err = Error::SelectionNotFound {
            role: SelectionRole::Origin,
            id: "abc".to_string(),
            suggestion: Some("abd".to_string()),
        };
        assert_eq!(err.to_string(), "No cell found for origin 'abc'. Did you mean 'abd'?");

        let err = Error::SelectionNotFound {
            role: SelectionRole::Destination,
            id: "abc".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "No cell found for destination 'abc'");
    }
}
