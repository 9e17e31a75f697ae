//! Benchmark and continuous-test run descriptors.
//!
//! Runs are acknowledged with a `running` descriptor only; nothing is
//! executed against the target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cluster_link::non_empty;

pub const DEFAULT_BENCHMARK_TYPE: &str = "stress";
pub const DEFAULT_BENCHMARK_ITERATIONS: u64 = 100;
pub const DEFAULT_TEST_TYPE: &str = "continuous";
pub const DEFAULT_TEST_MAX_ITERATIONS: u64 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub iterations: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRun {
    pub endpoint: String,
    pub test_type: String,
    pub iterations: u64,
    pub start_time: DateTime<Utc>,
    pub status: RunStatus,
}

impl BenchmarkRequest {
    /// Returns `None` when no endpoint was supplied.
    pub fn start(&self, now: DateTime<Utc>) -> Option<BenchmarkRun> {
        let endpoint = non_empty(self.endpoint.as_deref())?;
        Some(BenchmarkRun {
            endpoint: endpoint.to_string(),
            test_type: non_empty(self.test_type.as_deref())
                .unwrap_or(DEFAULT_BENCHMARK_TYPE)
                .to_string(),
            iterations: self
                .iterations
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_BENCHMARK_ITERATIONS),
            start_time: now,
            status: RunStatus::Running,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunRequest {
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub max_iterations: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub cluster_name: String,
    pub test_type: String,
    pub max_iterations: u64,
    pub start_time: DateTime<Utc>,
    pub status: RunStatus,
    pub message: String,
}

impl TestRunRequest {
    /// Returns `None` when no cluster name was supplied.
    pub fn start(&self, now: DateTime<Utc>) -> Option<TestRun> {
        let cluster_name = non_empty(self.cluster_name.as_deref())?;
        Some(TestRun {
            cluster_name: cluster_name.to_string(),
            test_type: non_empty(self.test_type.as_deref())
                .unwrap_or(DEFAULT_TEST_TYPE)
                .to_string(),
            max_iterations: self
                .max_iterations
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_TEST_MAX_ITERATIONS),
            start_time: now,
            status: RunStatus::Running,
            message: format!(
                "Running continuous tests on {cluster_name} until failure is detected"
            ),
        })
    }
}
