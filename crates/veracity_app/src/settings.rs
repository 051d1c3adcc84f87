use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use veracity_core::{AnalysisKind, ValidationLimits, DEFAULT_MAX_FILE_BYTES};
use veracity_engine::{HttpSettings, SimulationSettings, WorkflowSettings};
use veracity_logging::veracity_info;

/// Extra time the HTTP client waits beyond the analysis timeout, so a silent
/// backend is reported by the workflow deadline.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Settings file contents. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Overrides every panel's progress interval.
    pub tick_interval_ms: Option<u64>,
    /// Overrides every panel's largest progress step.
    pub max_increment: Option<u8>,
    pub timeout_ms: u64,
    pub max_file_bytes: u64,
    pub backend_url: Option<String>,
    pub simulated: SimulatedSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedSection {
    pub media_delay_ms: u64,
    pub claim_delay_ms: u64,
    pub news_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let workflow = WorkflowSettings::default();
        Self {
            tick_interval_ms: None,
            max_increment: None,
            timeout_ms: workflow.timeout.as_millis() as u64,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            backend_url: None,
            simulated: SimulatedSection::default(),
        }
    }
}

impl Default for SimulatedSection {
    fn default() -> Self {
        let simulation = SimulationSettings::default();
        Self {
            media_delay_ms: simulation.media_delay.as_millis() as u64,
            claim_delay_ms: simulation.claim_delay.as_millis() as u64,
            news_delay_ms: simulation.news_delay.as_millis() as u64,
            jitter_ms: simulation.jitter.as_millis() as u64,
        }
    }
}

impl AppSettings {
    /// Reads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Self = ron::from_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        veracity_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// A backend given on the command line wins over the file.
    pub fn with_backend(mut self, backend: Option<String>) -> Self {
        if backend.is_some() {
            self.backend_url = backend;
        }
        self
    }

    pub fn workflow_settings(&self, kind: AnalysisKind, seed: Option<u64>) -> WorkflowSettings {
        let panel = WorkflowSettings::for_kind(kind);
        WorkflowSettings {
            tick_interval: self
                .tick_interval_ms
                .map_or(panel.tick_interval, Duration::from_millis),
            max_increment: self.max_increment.unwrap_or(panel.max_increment),
            timeout: self.timeout(),
            limits: ValidationLimits {
                max_file_bytes: self.max_file_bytes,
            },
            seed,
        }
    }

    pub fn http_settings(&self, base_url: &str) -> HttpSettings {
        HttpSettings {
            request_timeout: self.timeout() + HTTP_TIMEOUT_SLACK,
            ..HttpSettings::new(base_url)
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulation_settings(&self, seed: Option<u64>) -> SimulationSettings {
        SimulationSettings {
            media_delay: Duration::from_millis(self.simulated.media_delay_ms),
            claim_delay: Duration::from_millis(self.simulated.claim_delay_ms),
            news_delay: Duration::from_millis(self.simulated.news_delay_ms),
            jitter: Duration::from_millis(self.simulated.jitter_ms),
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_path_gives_defaults() {
        let settings = AppSettings::load(None).expect("defaults");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.tick_interval_ms, None);
        assert_eq!(settings.max_increment, None);
        assert_eq!(settings.timeout_ms, 30_000);
        assert_eq!(settings.simulated.claim_delay_ms, 4000);
    }

    #[test]
    fn panels_keep_their_own_progress_cadence() {
        let settings = AppSettings::default();

        let claim = settings.workflow_settings(AnalysisKind::ClaimCheck, None);
        assert_eq!(claim.tick_interval, Duration::from_millis(300));
        assert_eq!(claim.max_increment, 20);

        let news = settings.workflow_settings(AnalysisKind::NewsCheck, None);
        assert_eq!(news.tick_interval, Duration::from_millis(250));
        assert_eq!(news.max_increment, 15);
    }

    #[test]
    fn cadence_override_applies_to_every_panel() {
        let settings = AppSettings {
            tick_interval_ms: Some(100),
            max_increment: Some(5),
            ..AppSettings::default()
        };
        for kind in [
            AnalysisKind::MediaCheck,
            AnalysisKind::ClaimCheck,
            AnalysisKind::NewsCheck,
        ] {
            let workflow = settings.workflow_settings(kind, None);
            assert_eq!(workflow.tick_interval, Duration::from_millis(100));
            assert_eq!(workflow.max_increment, 5);
        }
    }

    #[test]
    fn http_client_outlasts_the_analysis_timeout() {
        let settings = AppSettings {
            timeout_ms: 60_000,
            ..AppSettings::default()
        };
        let http = settings.http_settings("http://localhost:9000");
        let workflow = settings.workflow_settings(AnalysisKind::NewsCheck, None);

        assert_eq!(http.base_url, "http://localhost:9000");
        assert!(http.request_timeout > workflow.timeout);
        assert_eq!(http.request_timeout, Duration::from_secs(65));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("veracity.ron");
        fs::write(
            &path,
            r#"(
                timeout_ms: 5000,
                max_increment: Some(8),
                backend_url: Some("http://localhost:9000"),
                simulated: (jitter_ms: 250),
            )"#,
        )
        .expect("write settings");

        let settings = AppSettings::load(Some(&path)).expect("parsed");

        assert_eq!(settings.timeout_ms, 5000);
        assert_eq!(settings.backend_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(settings.simulated.jitter_ms, 250);
        assert_eq!(settings.simulated.media_delay_ms, 3000);
        assert_eq!(settings.max_file_bytes, DEFAULT_MAX_FILE_BYTES);

        let workflow = settings.workflow_settings(AnalysisKind::ClaimCheck, Some(9));
        assert_eq!(workflow.timeout, Duration::from_secs(5));
        assert_eq!(workflow.seed, Some(9));
        assert_eq!(workflow.max_increment, 8);
        assert_eq!(workflow.tick_interval, Duration::from_millis(300));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(timeout_ms: \"soon\")").expect("write settings");

        let err = AppSettings::load(Some(&path)).expect_err("type mismatch");
        assert!(format!("{err:#}").contains("broken.ron"));
    }

    #[test]
    fn command_line_backend_overrides_file() {
        let settings = AppSettings {
            backend_url: Some("http://from-file".to_string()),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.clone().with_backend(None).backend_url.as_deref(),
            Some("http://from-file")
        );
        assert_eq!(
            settings
                .with_backend(Some("http://from-cli".to_string()))
                .backend_url
                .as_deref(),
            Some("http://from-cli")
        );
    }
}
