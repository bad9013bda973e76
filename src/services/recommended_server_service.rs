// src/services/recommended_server_service.rs
//
// Recommended Server Service - probing and scoring of candidates
//
// CRITICAL RULES:
// - Exactly one ProbeResult per candidate, in candidate order
// - A failed probe is a BAD result without system info, never an error
// - Scoring is deterministic: same facts → same score
//
// SCORING:
// The final score is the worst of three independent ratings:
// - Security:    https → GREAT, http → GOOD
// - Speed:       fast → GREAT, slow → GOOD, very slow → OK
// - System info: missing/foreign/too old → BAD, outdated → OK, else GREAT

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ConnectionConfig;
use crate::domain::{ProbeIssue, ProbeResult, ProbeScore, PublicSystemInfo, EXPECTED_PRODUCT_NAME};
use crate::integrations::SystemInfoFetcher;

/// Probes candidate addresses and classifies each one
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerProber: Send + Sync {
    /// One result per candidate, in candidate order
    async fn probe(&self, candidates: &[String]) -> Vec<ProbeResult>;
}

// ============================================================================
// SCORING RULES
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScoringRules {
    pub slow_response: Duration,
    pub very_slow_response: Duration,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_config(&ConnectionConfig::default())
    }
}

impl ScoringRules {
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            slow_response: config.slow_response(),
            very_slow_response: config.very_slow_response(),
        }
    }

    /// Classify one probed candidate
    pub fn score(
        &self,
        address: &str,
        system_info: Result<PublicSystemInfo, String>,
        response_time: Duration,
    ) -> ProbeResult {
        let mut issues = Vec::new();

        let security = Self::security_score(address, &mut issues);

        let (system_info, info_score, speed) = match system_info {
            Ok(info) => {
                let info_score = Self::system_info_score(&info, &mut issues);
                let speed = self.speed_score(response_time, &mut issues);
                (Some(info), info_score, speed)
            }
            Err(reason) => {
                issues.push(ProbeIssue::Unreachable { reason });
                (None, ProbeScore::Bad, ProbeScore::Bad)
            }
        };

        let score = security.min(speed).min(info_score);

        ProbeResult::new(address, score, system_info)
            .with_issues(issues)
            .with_response_time(response_time)
    }

    fn security_score(address: &str, issues: &mut Vec<ProbeIssue>) -> ProbeScore {
        if address.starts_with("https://") {
            ProbeScore::Great
        } else {
            issues.push(ProbeIssue::MissingHttps);
            ProbeScore::Good
        }
    }

    fn speed_score(&self, response_time: Duration, issues: &mut Vec<ProbeIssue>) -> ProbeScore {
        if response_time < self.slow_response {
            return ProbeScore::Great;
        }

        issues.push(ProbeIssue::SlowResponse {
            response_time_ms: response_time.as_millis() as u64,
        });

        if response_time < self.very_slow_response {
            ProbeScore::Good
        } else {
            ProbeScore::Ok
        }
    }

    fn system_info_score(info: &PublicSystemInfo, issues: &mut Vec<ProbeIssue>) -> ProbeScore {
        if let Some(product_name) = &info.product_name {
            if product_name != EXPECTED_PRODUCT_NAME {
                issues.push(ProbeIssue::InvalidProductName {
                    product_name: product_name.clone(),
                });
                return ProbeScore::Bad;
            }
        }

        let Some(version) = info.parsed_version() else {
            issues.push(ProbeIssue::MissingVersion);
            return ProbeScore::Bad;
        };

        if !version.is_supported() {
            issues.push(ProbeIssue::UnsupportedServerVersion { version });
            ProbeScore::Bad
        } else if version.is_outdated() {
            issues.push(ProbeIssue::OutdatedServerVersion { version });
            ProbeScore::Ok
        } else {
            ProbeScore::Great
        }
    }
}

// ============================================================================
// RECOMMENDED SERVER SERVICE
// ============================================================================

pub struct RecommendedServerService {
    fetcher: Arc<dyn SystemInfoFetcher>,
    rules: ScoringRules,
}

impl RecommendedServerService {
    pub fn new(fetcher: Arc<dyn SystemInfoFetcher>, rules: ScoringRules) -> Self {
        Self { fetcher, rules }
    }

    async fn probe_one(&self, address: &str) -> ProbeResult {
        let started = Instant::now();
        let system_info = self
            .fetcher
            .public_system_info(address)
            .await
            .map_err(|e| e.to_string());
        let response_time = started.elapsed();

        if let Err(reason) = &system_info {
            log::debug!("Probe of {} failed: {}", address, reason);
        }

        let result = self.rules.score(address, system_info, response_time);
        log::debug!(
            "Probed {} in {} ms: {} {:?}",
            address,
            response_time.as_millis(),
            result.score,
            result.issues
        );
        result
    }
}

#[async_trait]
impl ServerProber for RecommendedServerService {
    async fn probe(&self, candidates: &[String]) -> Vec<ProbeResult> {
        // join_all keeps the input order
        join_all(candidates.iter().map(|address| self.probe_one(address))).await
    }
}
