use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AnalysisKind, SchemaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaVerdict {
    Authentic,
    Manipulated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReport {
    pub confidence_percent: f64,
    pub verdict: MediaVerdict,
    pub details: Vec<String>,
    pub processing_time_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMatch {
    pub name: String,
    pub url: String,
    pub reliability: Reliability,
    pub match_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Verified,
    Disputed,
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAssessment {
    pub text: String,
    pub status: ClaimStatus,
    pub confidence_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReport {
    pub credibility_percent: f64,
    pub sources: Vec<SourceMatch>,
    pub claims: Vec<ClaimAssessment>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasRating {
    Left,
    Center,
    Right,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactualityRating {
    High,
    Mixed,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMetrics {
    pub shares: u64,
    pub engagement: u64,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarArticle {
    pub title: String,
    pub source: String,
    pub similarity_percent: f64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsReport {
    pub authenticity_percent: f64,
    pub bias_rating: BiasRating,
    pub factuality_rating: FactualityRating,
    pub source_credibility_percent: f64,
    pub publish_date: NaiveDate,
    pub social_metrics: SocialMetrics,
    pub similar_articles: Vec<SimilarArticle>,
    pub warnings: Vec<String>,
}

/// Outcome of one analysis, tagged by panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Media(MediaReport),
    Claim(ClaimReport),
    News(NewsReport),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Media(_) => AnalysisKind::MediaCheck,
            AnalysisResult::Claim(_) => AnalysisKind::ClaimCheck,
            AnalysisResult::News(_) => AnalysisKind::NewsCheck,
        }
    }

    /// Primary 0-100 metric shown for the panel.
    pub fn score(&self) -> f64 {
        match self {
            AnalysisResult::Media(report) => report.confidence_percent,
            AnalysisResult::Claim(report) => report.credibility_percent,
            AnalysisResult::News(report) => report.authenticity_percent,
        }
    }

    /// Categorical verdict. Claims report their weakest claim status.
    pub fn verdict(&self) -> String {
        match self {
            AnalysisResult::Media(report) => report.verdict.to_string(),
            AnalysisResult::Claim(report) => report
                .claims
                .iter()
                .map(|claim| claim.status)
                .max_by_key(|status| match status {
                    ClaimStatus::Verified => 0,
                    ClaimStatus::Unverified => 1,
                    ClaimStatus::Disputed => 2,
                })
                .unwrap_or(ClaimStatus::Unverified)
                .to_string(),
            AnalysisResult::News(report) => report.factuality_rating.to_string(),
        }
    }

    /// Checks the payload against the schema of `expected`.
    pub fn validate(&self, expected: AnalysisKind) -> Result<(), SchemaError> {
        if self.kind() != expected {
            return Err(SchemaError::KindMismatch {
                expected,
                actual: self.kind(),
            });
        }
        match self {
            AnalysisResult::Media(report) => {
                check_percent("confidencePercent", report.confidence_percent)?;
                if !report.processing_time_seconds.is_finite()
                    || report.processing_time_seconds < 0.0
                {
                    return Err(SchemaError::OutOfRange {
                        field: "processingTimeSeconds".to_string(),
                        value: report.processing_time_seconds,
                    });
                }
            }
            AnalysisResult::Claim(report) => {
                check_percent("credibilityPercent", report.credibility_percent)?;
                for (index, source) in report.sources.iter().enumerate() {
                    check_percent(&format!("sources[{index}].matchPercent"), source.match_percent)?;
                }
                for (index, claim) in report.claims.iter().enumerate() {
                    check_percent(
                        &format!("claims[{index}].confidencePercent"),
                        claim.confidence_percent,
                    )?;
                }
            }
            AnalysisResult::News(report) => {
                check_percent("authenticityPercent", report.authenticity_percent)?;
                check_percent(
                    "sourceCredibilityPercent",
                    report.source_credibility_percent,
                )?;
                for (index, article) in report.similar_articles.iter().enumerate() {
                    check_percent(
                        &format!("similarArticles[{index}].similarityPercent"),
                        article.similarity_percent,
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), SchemaError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

macro_rules! lowercase_display {
    ($($ty:ty => { $($variant:ident => $label:literal),+ $(,)? }),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let label = match self {
                        $(Self::$variant => $label,)+
                    };
                    f.write_str(label)
                }
            }
        )+
    };
}

lowercase_display! {
    MediaVerdict => { Authentic => "authentic", Manipulated => "manipulated" },
    Reliability => { High => "high", Medium => "medium", Low => "low" },
    ClaimStatus => { Verified => "verified", Disputed => "disputed", Unverified => "unverified" },
    BiasRating => { Left => "left", Center => "center", Right => "right", Mixed => "mixed" },
    FactualityRating => { High => "high", Mixed => "mixed", Low => "low" },
    Sentiment => { Positive => "positive", Negative => "negative", Neutral => "neutral" },
}
