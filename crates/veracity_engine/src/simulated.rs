use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use veracity_core::{
    AnalysisKind, AnalysisRequest, AnalysisResult, BiasRating, ClaimAssessment, ClaimReport,
    ClaimStatus, FactualityRating, MediaReport, MediaVerdict, NewsReport, Reliability, Sentiment,
    ServiceError, SimilarArticle, SocialMetrics, SourceMatch,
};
use veracity_logging::veracity_debug;

use crate::AnalysisService;

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub media_delay: Duration,
    pub claim_delay: Duration,
    pub news_delay: Duration,
    /// Extra random delay added on top, up to this bound.
    pub jitter: Duration,
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            media_delay: Duration::from_millis(3000),
            claim_delay: Duration::from_millis(4000),
            news_delay: Duration::from_millis(3500),
            jitter: Duration::ZERO,
            seed: None,
        }
    }
}

impl SimulationSettings {
    pub fn delay_for(&self, kind: AnalysisKind) -> Duration {
        match kind {
            AnalysisKind::MediaCheck => self.media_delay,
            AnalysisKind::ClaimCheck => self.claim_delay,
            AnalysisKind::NewsCheck => self.news_delay,
        }
    }
}

/// Stand-in backend: waits, then returns randomized scores and canned findings.
#[derive(Debug)]
pub struct SimulatedAnalysisService {
    settings: SimulationSettings,
    rng: Mutex<StdRng>,
}

impl SimulatedAnalysisService {
    pub fn new(settings: SimulationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            settings,
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl Default for SimulatedAnalysisService {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

#[async_trait::async_trait]
impl AnalysisService for SimulatedAnalysisService {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, ServiceError> {
        let jitter = self.with_rng(|rng| {
            let max = self.settings.jitter.as_millis() as u64;
            Duration::from_millis(if max == 0 { 0 } else { rng.gen_range(0..=max) })
        });
        let delay = self.settings.delay_for(kind) + jitter;
        veracity_debug!(
            "Simulating {} over {} input(s), delay {:?}",
            kind,
            request.inputs().len(),
            delay
        );
        tokio::time::sleep(delay).await;

        Ok(self.with_rng(|rng| simulate(kind, rng)))
    }
}

pub(crate) fn simulate(kind: AnalysisKind, rng: &mut impl Rng) -> AnalysisResult {
    match kind {
        AnalysisKind::MediaCheck => AnalysisResult::Media(media_report(rng)),
        AnalysisKind::ClaimCheck => AnalysisResult::Claim(claim_report(rng)),
        AnalysisKind::NewsCheck => AnalysisResult::News(news_report(rng)),
    }
}

fn media_report(rng: &mut impl Rng) -> MediaReport {
    let verdict = if rng.gen_bool(0.3) {
        MediaVerdict::Manipulated
    } else {
        MediaVerdict::Authentic
    };
    MediaReport {
        confidence_percent: rng.gen_range(60.0..100.0),
        verdict,
        details: [
            "Facial landmark analysis completed",
            "Temporal consistency check performed",
            "Neural network artifacts detected",
            "Pixel-level analysis completed",
        ]
        .map(String::from)
        .to_vec(),
        processing_time_seconds: 2.8,
    }
}

fn claim_report(rng: &mut impl Rng) -> ClaimReport {
    let source = |name: &str, url: &str, reliability, match_percent| SourceMatch {
        name: name.to_string(),
        url: url.to_string(),
        reliability,
        match_percent,
    };
    let primary_status = if rng.gen_bool(0.7) {
        ClaimStatus::Verified
    } else {
        ClaimStatus::Disputed
    };
    ClaimReport {
        credibility_percent: rng.gen_range(60.0..100.0),
        sources: vec![
            source("Reuters", "https://reuters.com", Reliability::High, 85.0),
            source("BBC News", "https://bbc.com", Reliability::High, 78.0),
            source("Wikipedia", "https://wikipedia.org", Reliability::Medium, 92.0),
        ],
        claims: vec![
            ClaimAssessment {
                text: "Primary claim extracted from content".to_string(),
                status: primary_status,
                confidence_percent: rng.gen_range(70.0..100.0),
            },
            ClaimAssessment {
                text: "Secondary supporting statement".to_string(),
                status: ClaimStatus::Verified,
                confidence_percent: rng.gen_range(80.0..100.0),
            },
        ],
        summary: "Information appears to be partially verifiable with reliable sources."
            .to_string(),
    }
}

fn news_report(rng: &mut impl Rng) -> NewsReport {
    let bias_rating = *[
        BiasRating::Left,
        BiasRating::Center,
        BiasRating::Right,
        BiasRating::Mixed,
    ]
    .choose(rng)
    .unwrap_or(&BiasRating::Mixed);
    let factuality_rating = *[
        FactualityRating::High,
        FactualityRating::Mixed,
        FactualityRating::Low,
    ]
    .choose(rng)
    .unwrap_or(&FactualityRating::Mixed);
    let sentiment = *[Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        .choose(rng)
        .unwrap_or(&Sentiment::Neutral);
    let warnings = if rng.gen_bool(0.5) {
        vec![
            "Potential clickbait headline detected".to_string(),
            "Limited source verification".to_string(),
        ]
    } else {
        Vec::new()
    };

    NewsReport {
        authenticity_percent: rng.gen_range(60.0..100.0),
        bias_rating,
        factuality_rating,
        source_credibility_percent: rng.gen_range(70.0..100.0),
        publish_date: NaiveDate::from_ymd_opt(2024, 8, 20).unwrap_or_default(),
        social_metrics: SocialMetrics {
            shares: rng.gen_range(1000..11_000),
            engagement: rng.gen_range(500..5500),
            sentiment,
        },
        similar_articles: vec![
            SimilarArticle {
                title: "Related coverage from Reuters".to_string(),
                source: "Reuters".to_string(),
                similarity_percent: 87.0,
                url: "https://reuters.com".to_string(),
            },
            SimilarArticle {
                title: "Similar story from Associated Press".to_string(),
                source: "AP News".to_string(),
                similarity_percent: 75.0,
                url: "https://apnews.com".to_string(),
            },
        ],
        warnings,
    }
}
