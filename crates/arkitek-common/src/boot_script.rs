//! iPXE boot script rendering.
//!
//! The generator is a pure function of its inputs plus a generation
//! timestamp. It never touches the registry or the filesystem.

use std::num::NonZeroU32;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster_link::non_empty;

/// Initrd image loaded by every generated script. Not configurable.
pub const INITRD_IMAGE: &str = "http://boot.example.com/initrd.img";

pub const DEFAULT_BOOT_IMAGE: &str = "http://boot.example.com/vmlinuz";
pub const DEFAULT_KERNEL_PARAMS: &str = "quiet splash";

/// Largest server count the generator accepts.
pub const MAX_SERVER_COUNT: u32 = 10_000;

/// Menu timeout in milliseconds before the default entry is chosen.
const MENU_TIMEOUT_MS: u32 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootScriptError {
    #[error("cluster name is required")]
    MissingClusterName,
    #[error("server count is required")]
    MissingServerCount,
    #[error("server count must be an integer between 1 and {max}, got {0:?}", max = MAX_SERVER_COUNT)]
    InvalidServerCount(String),
    #[error("{0} must not contain control characters")]
    ControlCharacter(&'static str),
}

/// Fallbacks for the optional generator inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDefaults {
    pub boot_image: String,
    pub kernel_params: String,
}

impl Default for BootDefaults {
    fn default() -> Self {
        Self {
            boot_image: DEFAULT_BOOT_IMAGE.to_string(),
            kernel_params: DEFAULT_KERNEL_PARAMS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootScriptRequest {
    pub cluster_name: String,
    pub server_count: NonZeroU32,
    pub boot_image: Option<String>,
    pub kernel_params: Option<String>,
}

impl BootScriptRequest {
    pub fn new(cluster_name: impl Into<String>, server_count: NonZeroU32) -> Result<Self, BootScriptError> {
        let cluster_name = cluster_name.into();
        if cluster_name.is_empty() {
            return Err(BootScriptError::MissingClusterName);
        }
        single_line("clusterName", &cluster_name)?;
        check_upper_bound(server_count)?;
        Ok(Self {
            cluster_name,
            server_count,
            boot_image: None,
            kernel_params: None,
        })
    }

    pub fn with_boot_image(mut self, boot_image: impl Into<String>) -> Self {
        self.boot_image = Some(boot_image.into());
        self
    }

    pub fn with_kernel_params(mut self, kernel_params: impl Into<String>) -> Self {
        self.kernel_params = Some(kernel_params.into());
        self
    }

    /// Checks every value that is spliced into the script.
    ///
    /// The fields are public, so callers that set them directly run this
    /// before rendering.
    pub fn validate(&self) -> Result<(), BootScriptError> {
        if self.cluster_name.is_empty() {
            return Err(BootScriptError::MissingClusterName);
        }
        single_line("clusterName", &self.cluster_name)?;
        check_upper_bound(self.server_count)?;
        if let Some(boot_image) = &self.boot_image {
            single_line("bootImage", boot_image)?;
        }
        if let Some(kernel_params) = &self.kernel_params {
            single_line("kernelParams", kernel_params)?;
        }
        Ok(())
    }

    /// Download name offered to clients, `<cluster>-boot.ipxe`.
    pub fn suggested_filename(&self) -> String {
        format!("{}-boot.ipxe", self.cluster_name)
    }
}

/// A newline in any interpolated value would start a new iPXE command.
fn single_line(field: &'static str, value: &str) -> Result<(), BootScriptError> {
    if value.chars().any(char::is_control) {
        return Err(BootScriptError::ControlCharacter(field));
    }
    Ok(())
}

fn check_upper_bound(count: NonZeroU32) -> Result<(), BootScriptError> {
    if count.get() > MAX_SERVER_COUNT {
        return Err(BootScriptError::InvalidServerCount(count.to_string()));
    }
    Ok(())
}

/// Parses a server count as typed by a user ("3", " 12 ").
///
/// Zero, negative and fractional values are rejected rather than producing
/// a deploy section without any server stanza, and so is anything above
/// [`MAX_SERVER_COUNT`].
pub fn parse_server_count(raw: &str) -> Result<NonZeroU32, BootScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BootScriptError::MissingServerCount);
    }
    let count = trimmed
        .parse::<NonZeroU32>()
        .map_err(|_| BootScriptError::InvalidServerCount(trimmed.to_string()))?;
    check_upper_bound(count)?;
    Ok(count)
}

/// Renders the script stamped with the current time.
pub fn generate(req: &BootScriptRequest, defaults: &BootDefaults) -> String {
    render(req, defaults, Utc::now())
}

/// Renders the script with an explicit generation timestamp.
pub fn render(req: &BootScriptRequest, defaults: &BootDefaults, generated_at: DateTime<Utc>) -> String {
    let cluster = req.cluster_name.as_str();
    let count = req.server_count.get();
    let boot_image = non_empty(req.boot_image.as_deref()).unwrap_or(&defaults.boot_image);
    let kernel_params = non_empty(req.kernel_params.as_deref()).unwrap_or(&defaults.kernel_params);
    let generated = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut script = format!(
        "#!ipxe
#
# iPXE Boot Configuration for {cluster}
# Generated: {generated}
# Servers: {count}
#

echo ========================================
echo  Arkitek Builder - Mass Server Deployment
echo  Cluster: {cluster}
echo  Server Count: {count}
echo ========================================
echo

# Network configuration
dhcp || echo DHCP failed, trying static...

# Boot menu
:start
menu iPXE Boot Menu - {cluster}
item --key 1 deploy Deploy {count} Servers
item --key 2 shell  iPXE Shell
item --key 3 reboot Reboot
choose --default deploy --timeout {MENU_TIMEOUT_MS} target && goto ${{target}}

:deploy
echo Deploying {count} servers for {cluster}...
"
    );

    for i in 1..=count {
        script.push_str(&format!(
            "
# Server {i} configuration
echo Configuring server {i}/{count}...
set server-{i}-hostname {cluster}-node-{i}
"
        ));
    }

    script.push_str(&format!(
        "
# Boot kernel
echo Loading kernel and initrd...
kernel {boot_image} {kernel_params} cluster={cluster} nodes={count}
initrd {INITRD_IMAGE}
boot || goto failed

:shell
echo Entering iPXE shell...
shell

:failed
echo Boot failed! Press any key to return to menu...
prompt
goto start

:reboot
echo Rebooting in 3 seconds...
sleep 3
reboot
"
    ));

    script
}
