use std::path::PathBuf;

use clap::Parser;

use arkitek_common::boot_script::{DEFAULT_BOOT_IMAGE, DEFAULT_KERNEL_PARAMS};
use arkitek_common::telemetry::LogFormat;
use arkitek_common::LinkDefaults;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[arg(long, env = "ARKITEK_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: String,

    /// JSON file holding the cluster link collection.
    #[arg(long, env = "ARKITEK_LINKS_FILE", default_value = "cluster-links.json")]
    pub links_file: PathBuf,

    /// Keep links in memory only; nothing is written to disk.
    #[arg(long, env = "ARKITEK_EPHEMERAL", default_value_t = false)]
    pub ephemeral: bool,

    /// Directory served for any path outside the API.
    #[arg(long, env = "ARKITEK_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    #[arg(long, env = "ARKITEK_DEFAULT_BUILDER_TYPE", default_value = LinkDefaults::DEFAULT_BUILDER_TYPE)]
    pub default_builder_type: String,

    #[arg(long, env = "ARKITEK_DEFAULT_CREDENTIALS", default_value = "")]
    pub default_credentials: String,

    /// Kernel image used when a boot script request names none.
    #[arg(long, env = "ARKITEK_BOOT_IMAGE", default_value = DEFAULT_BOOT_IMAGE)]
    pub boot_image: String,

    /// Kernel parameters used when a boot script request names none.
    #[arg(long, env = "ARKITEK_KERNEL_PARAMS", default_value = DEFAULT_KERNEL_PARAMS)]
    pub kernel_params: String,

    /// Log output format: text or json.
    #[arg(long, env = "ARKITEK_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// OTLP endpoint for exporting traces (e.g. "http://127.0.0.1:4318").
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Bearer token for the OTLP endpoint.
    #[arg(long, env = "OTLP_TOKEN")]
    pub otlp_token: Option<String>,
}
