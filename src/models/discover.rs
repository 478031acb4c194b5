use serde::{Deserialize, Serialize};

use super::GenreId;
use crate::error::{AppError, AppResult};

pub const MAX_RATING: f64 = 10.0;

/// Filtered catalog discovery
///
/// A movie matches when it carries any of `genres` (all genres when the
/// list is empty), was released within the inclusive year range and has at
/// least `min_rating` average votes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    #[serde(default)]
    pub genres: Vec<GenreId>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_rating: Option<f64>,
}

impl DiscoverFilters {
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                return Err(AppError::InvalidInput(format!(
                    "year_from ({}) is after year_to ({})",
                    from, to
                )));
            }
        }
        if let Some(rating) = self.min_rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    /// Same filters with genres sorted and deduplicated
    pub fn normalized(mut self) -> Self {
        self.genres.sort_unstable();
        self.genres.dedup();
        self
    }

    /// Stable text form, used to key cached discovery pages
    pub fn fingerprint(&self) -> String {
        let genres: Vec<String> = self.genres.iter().map(|g| g.to_string()).collect();
        let year = |y: Option<i32>| y.map(|y| y.to_string()).unwrap_or_default();
        format!(
            "g={};y={}-{};r={}",
            genres.join(","),
            year(self.year_from),
            year(self.year_to),
            self.min_rating.map(|r| r.to_string()).unwrap_or_default()
        )
    }
}

/// Ratings are TMDb vote averages on a 0-10 scale
pub fn validate_rating(rating: f64) -> AppResult<()> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "rating must be between 0 and {}, got {}",
            MAX_RATING, rating
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_year_range_is_rejected() {
        let filters = DiscoverFilters {
            year_from: Some(2010),
            year_to: Some(2000),
            ..Default::default()
        };
        assert!(matches!(filters.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_rating_outside_scale_is_rejected() {
        assert!(validate_rating(10.0).is_ok());
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.5).is_err());
        assert!(validate_rating(-1.0).is_err());
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn test_open_ended_filters_are_valid() {
        let filters = DiscoverFilters {
            genres: vec![28],
            year_from: Some(1990),
            ..Default::default()
        };
        assert!(filters.validate().is_ok());
        assert!(DiscoverFilters::default().validate().is_ok());
    }

    #[test]
    fn test_fingerprint_ignores_genre_order() {
        let a = DiscoverFilters {
            genres: vec![28, 18, 28],
            year_from: Some(2000),
            year_to: Some(2010),
            min_rating: Some(7.5),
        }
        .normalized();
        let b = DiscoverFilters {
            genres: vec![18, 28],
            ..a.clone()
        }
        .normalized();

        assert_eq!(a.fingerprint(), "g=18,28;y=2000-2010;r=7.5");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
