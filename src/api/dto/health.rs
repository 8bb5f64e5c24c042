//! Health check and welcome DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2025-01-15T12:00:00Z",
    "checks": {
        "storage": {
            "status": "healthy",
            "message": "postgres connected",
            "response_time_ms": 3
        }
    }
}))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: jiff::Timestamp,
    /// Per-component results, keyed by component name
    pub checks: BTreeMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}

impl HealthResponse {
    /// Worst status among the checks, healthy when there are none.
    pub fn from_checks(version: &str, checks: BTreeMap<String, ComponentHealth>) -> Self {
        let status = checks
            .values()
            .map(|c| c.status)
            .fold(HealthStatus::Healthy, |acc, s| match (acc, s) {
                (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => {
                    HealthStatus::Unhealthy
                }
                (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
                _ => HealthStatus::Healthy,
            });

        Self {
            status,
            version: version.to_string(),
            timestamp: jiff::Timestamp::now(),
            checks,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    #[schema(example = "Welcome to the widgets API")]
    pub message: String,
}
