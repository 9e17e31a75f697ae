pub mod boot_script;
pub mod cluster_link;
pub mod runs;

pub use boot_script::{BootDefaults, BootScriptError, BootScriptRequest};
pub use cluster_link::{ClusterLink, LinkDefaults, LinkStatus, NewClusterLink};
pub use runs::{BenchmarkRequest, BenchmarkRun, RunStatus, TestRun, TestRunRequest};

pub mod telemetry;
