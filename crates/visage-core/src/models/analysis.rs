use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Likelihood bucket reported by the vision service for a facial attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
    /// Also absorbs values this service does not recognise.
    #[serde(other)]
    Unknown,
}

impl Likelihood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::Unknown => "UNKNOWN",
            Likelihood::VeryUnlikely => "VERY_UNLIKELY",
            Likelihood::Unlikely => "UNLIKELY",
            Likelihood::Possible => "POSSIBLE",
            Likelihood::Likely => "LIKELY",
            Likelihood::VeryLikely => "VERY_LIKELY",
        }
    }

    /// Human-readable label for the gallery.
    pub fn label(&self) -> &'static str {
        match self {
            Likelihood::Unknown => "unknown",
            Likelihood::VeryUnlikely => "very unlikely",
            Likelihood::Unlikely => "unlikely",
            Likelihood::Possible => "possible",
            Likelihood::Likely => "likely",
            Likelihood::VeryLikely => "very likely",
        }
    }
}

impl FromStr for Likelihood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNKNOWN" => Ok(Likelihood::Unknown),
            "VERY_UNLIKELY" => Ok(Likelihood::VeryUnlikely),
            "UNLIKELY" => Ok(Likelihood::Unlikely),
            "POSSIBLE" => Ok(Likelihood::Possible),
            "LIKELY" => Ok(Likelihood::Likely),
            "VERY_LIKELY" => Ok(Likelihood::VeryLikely),
            _ => Err(anyhow::anyhow!("Invalid likelihood: {}", s)),
        }
    }
}

impl Display for Likelihood {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Face analysis of one stored photo: the joy likelihood of the first detected face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub object_key: String,
    pub joy: Likelihood,
}

/// Persisted association between an object key and its analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalysisRecord {
    pub object_key: String,
    pub joy: Likelihood,
    pub recorded_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn result(&self) -> AnalysisResult {
        AnalysisResult {
            object_key: self.object_key.clone(),
            joy: self.joy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likelihood_wire_format() {
        let parsed: Likelihood = serde_json::from_str("\"VERY_LIKELY\"").unwrap();
        assert_eq!(parsed, Likelihood::VeryLikely);
        assert_eq!(
            serde_json::to_string(&Likelihood::VeryUnlikely).unwrap(),
            "\"VERY_UNLIKELY\""
        );
    }

    #[test]
    fn test_unrecognised_likelihood_is_unknown() {
        let parsed: Likelihood = serde_json::from_str("\"SOMEWHAT_LIKELY\"").unwrap();
        assert_eq!(parsed, Likelihood::Unknown);
    }

    #[test]
    fn test_analysis_result_with_unrecognised_joy() {
        let parsed: AnalysisResult =
            serde_json::from_str(r#"{"object_key":"a.jpg","joy":"EXTREMELY_LIKELY"}"#).unwrap();
        assert_eq!(parsed.joy, Likelihood::Unknown);

        let parsed: AnalysisResult =
            serde_json::from_str(r#"{"object_key":"a.jpg","joy":"LIKELY"}"#).unwrap();
        assert_eq!(parsed.joy, Likelihood::Likely);
    }

    #[test]
    fn test_likelihood_from_str_matches_display() {
        for value in [
            Likelihood::Unknown,
            Likelihood::VeryUnlikely,
            Likelihood::Unlikely,
            Likelihood::Possible,
            Likelihood::Likely,
            Likelihood::VeryLikely,
        ] {
            assert_eq!(value.to_string().parse::<Likelihood>().unwrap(), value);
        }
        assert!("maybe".parse::<Likelihood>().is_err());
    }
}
