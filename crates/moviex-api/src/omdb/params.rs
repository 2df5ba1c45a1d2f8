//! OMDb request parameter types.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Title kind accepted by the `type` search parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature films.
    Movie,
    /// TV series.
    Series,
    /// Single episodes of a series.
    Episode,
}

impl MediaType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }

    /// Advances an optional filter: `None -> Movie -> Series -> Episode -> None`.
    #[must_use]
    pub const fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Movie),
            Some(Self::Movie) => Some(Self::Series),
            Some(Self::Series) => Some(Self::Episode),
            Some(Self::Episode) => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => bail!("invalid media type: {other:?} (expected movie, series or episode)"),
        }
    }
}

/// Four-digit release year used by the `y` search parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ReleaseYear(u16);

impl ReleaseYear {
    /// Creates a year, rejecting values that are not exactly four digits.
    ///
    /// # Errors
    ///
    /// Returns an error if `year` is outside `1000..=9999`.
    pub fn new(year: u16) -> Result<Self> {
        if !(1000..=9999).contains(&year) {
            bail!("invalid year: {year} (expected 4 digits)");
        }
        Ok(Self(year))
    }

    /// Returns the numeric year.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for ReleaseYear {
    type Error = anyhow::Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ReleaseYear> for u16 {
    fn from(year: ReleaseYear) -> Self {
        year.0
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReleaseYear {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            bail!("invalid year: {s:?} (expected 4 digits)");
        }
        let Ok(year) = s.parse::<u16>() else {
            bail!("invalid year: {s:?} (expected 4 digits)");
        };
        Self::new(year)
    }
}

/// Optional search constraints. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Restrict results to one kind of title.
    #[serde(default)]
    pub media_type: Option<MediaType>,
    /// Restrict results to one release year.
    #[serde(default)]
    pub year: Option<ReleaseYear>,
}

impl SearchFilters {
    /// Returns `true` when no filter is set.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.media_type.is_none() && self.year.is_none()
    }
}

/// Request parameters for a title search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search term (`s`).
    pub query: String,
    /// 1-based page number (`page`).
    pub page: u32,
    /// Optional filters (`type`, `y`).
    pub filters: SearchFilters,
}

impl SearchParams {
    /// Creates search params for the first page with no filters.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            filters: SearchFilters::default(),
        }
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the filters.
    #[must_use]
    pub const fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Builds the query-string pairs. Unset filters are omitted entirely.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("s", self.query.clone()), ("page", self.page.to_string())];
        if let Some(media_type) = self.filters.media_type {
            query.push(("type", String::from(media_type.as_str())));
        }
        if let Some(year) = self.filters.year {
            query.push(("y", year.to_string()));
        }
        query
    }
}

/// Plot length requested from the detail endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlotLength {
    /// One-paragraph summary.
    Short,
    /// Full plot.
    #[default]
    Full,
}

impl PlotLength {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

impl FromStr for PlotLength {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "full" => Ok(Self::Full),
            other => bail!("invalid plot length: {other:?} (expected short or full)"),
        }
    }
}

/// Request parameters for a single-title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailParams {
    /// IMDb identifier (`i`), e.g. `tt0372784`.
    pub imdb_id: String,
    /// Plot length (`plot`).
    pub plot: PlotLength,
}

impl DetailParams {
    /// Creates lookup params with the full plot.
    #[must_use]
    pub fn new(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            plot: PlotLength::Full,
        }
    }

    /// Sets the plot length.
    #[must_use]
    pub const fn plot(mut self, plot: PlotLength) -> Self {
        self.plot = plot;
        self
    }

    /// Builds the query-string pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("i", self.imdb_id.clone()),
            ("plot", String::from(self.plot.as_str())),
        ]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn has_key(query: &[(&str, String)], key: &str) -> bool {
        query.iter().any(|(k, _)| *k == key)
    }

    #[test]
    fn test_search_query_with_type_only() {
        // Arrange
        let filters = SearchFilters {
            media_type: Some(MediaType::Movie),
            year: None,
        };
        let params = SearchParams::new("batman").filters(filters);

        // Act
        let query = params.to_query();

        // Assert
        assert_eq!(
            query,
            vec![
                ("s", String::from("batman")),
                ("page", String::from("1")),
                ("type", String::from("movie")),
            ]
        );
        assert!(!has_key(&query, "y"));
    }

    #[test]
    fn test_search_query_omits_unset_filters() {
        // Arrange
        let params = SearchParams::new("alien").page(3);

        // Act
        let query = params.to_query();

        // Assert
        assert!(!has_key(&query, "type"));
        assert!(!has_key(&query, "y"));
        assert!(query.contains(&("page", String::from("3"))));
    }

    #[test]
    fn test_search_query_with_year() {
        // Arrange
        let filters = SearchFilters {
            media_type: None,
            year: Some(ReleaseYear::new(2008).unwrap()),
        };
        let params = SearchParams::new("batman").filters(filters);

        // Act
        let query = params.to_query();

        // Assert
        assert!(query.contains(&("y", String::from("2008"))));
        assert!(!has_key(&query, "type"));
    }

    #[test]
    fn test_detail_query_defaults_to_full_plot() {
        // Arrange & Act
        let query = DetailParams::new("tt0372784").to_query();

        // Assert
        assert_eq!(
            query,
            vec![
                ("i", String::from("tt0372784")),
                ("plot", String::from("full")),
            ]
        );
    }

    #[test]
    fn test_release_year_parse() {
        // Arrange & Act & Assert
        assert_eq!("1999".parse::<ReleaseYear>().unwrap().get(), 1999);
        assert_eq!(" 2024 ".parse::<ReleaseYear>().unwrap().get(), 2024);
        assert!("99".parse::<ReleaseYear>().is_err());
        assert!("20x4".parse::<ReleaseYear>().is_err());
        assert!("12345".parse::<ReleaseYear>().is_err());
        assert!("".parse::<ReleaseYear>().is_err());
        assert!(ReleaseYear::new(999).is_err());
    }

    #[test]
    fn test_media_type_parse() {
        // Arrange & Act & Assert
        assert_eq!("Movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("series".parse::<MediaType>().unwrap(), MediaType::Series);
        assert_eq!("EPISODE".parse::<MediaType>().unwrap(), MediaType::Episode);
        assert!("game".parse::<MediaType>().is_err());
        assert!("".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_media_type_cycle() {
        // Arrange
        let mut current = None;
        let mut seen = Vec::new();

        // Act
        for _ in 0..4 {
            current = MediaType::cycle(current);
            seen.push(current);
        }

        // Assert
        assert_eq!(
            seen,
            vec![
                Some(MediaType::Movie),
                Some(MediaType::Series),
                Some(MediaType::Episode),
                None,
            ]
        );
    }

    #[test]
    fn test_filters_default_is_unconstrained() {
        // Arrange & Act
        let filters = SearchFilters::default();

        // Assert
        assert!(filters.is_unconstrained());
    }
}
