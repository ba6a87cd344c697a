use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Earliest release year a preference set may ask for
pub const MIN_YEAR: i32 = 1900;

/// Minimum-rating choices offered by the preference form
pub const MIN_RATINGS: [&str; 3] = ["7", "8", "9"];

/// Kind of content the user wants recommended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
    Any,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Movie => write!(f, "movie"),
            ContentType::Series => write!(f, "series"),
            ContentType::Any => write!(f, "any"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

/// Preferences submitted by the recommendation form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    pub mood: String,
    pub genre: String,
    pub year_range: YearRange,
    pub industry: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl PreferenceSet {
    /// Preferred language, if one was actually entered
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Minimum rating, if one was selected
    pub fn rating(&self) -> Option<&str> {
        self.rating
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Checks the preference set against the form's constraints
    pub fn validate(&self, current_year: i32) -> AppResult<()> {
        for (field, value) in [
            ("mood", &self.mood),
            ("genre", &self.genre),
            ("industry", &self.industry),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::InvalidInput(format!("{} is required", field)));
            }
        }

        let YearRange { start, end } = self.year_range;
        if start < MIN_YEAR || end > current_year {
            return Err(AppError::InvalidInput(format!(
                "Year range must be within {}-{}",
                MIN_YEAR, current_year
            )));
        }
        if start > end {
            return Err(AppError::InvalidInput(format!(
                "Year range start {} is after end {}",
                start, end
            )));
        }

        if let Some(rating) = self.rating() {
            if !MIN_RATINGS.contains(&rating) {
                return Err(AppError::InvalidInput(format!(
                    "Minimum rating must be one of {}",
                    MIN_RATINGS.join(", ")
                )));
            }
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::happy_comedy;
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_deserialize_form_payload() {
        let json = r#"{
            "mood": "happy",
            "genre": "Comedy",
            "yearRange": {"start": 2010, "end": 2023},
            "industry": "hollywood",
            "type": "movie",
            "language": "",
            "rating": "8"
        }"#;

        let prefs: PreferenceSet = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.year_range, YearRange { start: 2010, end: 2023 });
        assert_eq!(prefs.content_type, ContentType::Movie);
        assert_eq!(prefs.language(), None);
        assert_eq!(prefs.rating(), Some("8"));
    }

    #[test]
    fn test_optional_fields_may_be_omitted() {
        let json = r#"{
            "mood": "sad",
            "genre": "Drama",
            "yearRange": {"start": 1990, "end": 2000},
            "industry": "korean",
            "type": "series"
        }"#;

        let prefs: PreferenceSet = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.content_type, ContentType::Series);
        assert!(prefs.language.is_none());
        assert!(prefs.rating.is_none());
    }

    #[test]
    fn test_unknown_content_type_rejected() {
        let json = r#"{
            "mood": "sad",
            "genre": "Drama",
            "yearRange": {"start": 1990, "end": 2000},
            "industry": "korean",
            "type": "podcast"
        }"#;

        assert!(serde_json::from_str::<PreferenceSet>(json).is_err());
    }

    #[test]
    fn test_validate_accepts_form_defaults() {
        assert_ok!(happy_comedy().validate(2026));
    }

    #[test]
    fn test_validate_rejects_blank_mood() {
        let mut prefs = happy_comedy();
        prefs.mood = "  ".to_string();
        let err = assert_err!(prefs.validate(2026));
        assert!(err.to_string().contains("mood"));
    }

    #[test]
    fn test_validate_year_bounds() {
        let mut prefs = happy_comedy();
        prefs.year_range = YearRange { start: 1899, end: 2000 };
        assert_err!(prefs.validate(2026));

        prefs.year_range = YearRange { start: 2000, end: 2027 };
        assert_err!(prefs.validate(2026));

        prefs.year_range = YearRange { start: 2020, end: 2010 };
        assert_err!(prefs.validate(2026));

        prefs.year_range = YearRange { start: 1900, end: 2026 };
        assert_ok!(prefs.validate(2026));

        prefs.year_range = YearRange { start: 2015, end: 2015 };
        assert_ok!(prefs.validate(2026));
    }

    #[test]
    fn test_validate_rating_set() {
        let mut prefs = happy_comedy();
        prefs.rating = Some("6".to_string());
        assert_err!(prefs.validate(2026));

        prefs.rating = Some("9".to_string());
        assert_ok!(prefs.validate(2026));

        prefs.rating = Some(String::new());
        assert_ok!(prefs.validate(2026));
    }
}
