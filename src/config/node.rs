use super::wan_consumer::WanConsumerConfig;
use crate::versioning::Version;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_PARTITION_COUNT: u32 = 271;
pub const DEFAULT_PARTITION_THREADS: usize = 4;

/// Settings for one data node, taken from the command line.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub partition_count: u32,
    pub partition_threads: usize,
    /// Version assumed for clients that do not announce one.
    pub cluster_version: Version,
    pub wan_consumers_file: Option<PathBuf>,
    pub log_level: tracing::Level,
}

impl NodeConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            partition_count: DEFAULT_PARTITION_COUNT,
            partition_threads: DEFAULT_PARTITION_THREADS,
            cluster_version: Version::CURRENT,
            wan_consumers_file: None,
            log_level: tracing::Level::INFO,
        }
    }

    pub fn usage(program: &str) -> String {
        format!(
            "Usage: {program} --bind <addr:port> [--partitions <n>] [--partition-threads <n>] \
             [--cluster-version <major.minor>] [--wan-consumers <file.json>] [--log-level <level>]"
        )
    }

    /// Parses `args` as produced by `std::env::args()` (program name first).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut bind_addr: Option<SocketAddr> = None;
        let mut config = NodeConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .map(String::as_str)
                    .with_context(|| format!("{flag} requires a value"))
            };

            match flag {
                "--bind" => {
                    bind_addr = Some(value()?.parse().context("--bind")?);
                }
                "--partitions" => {
                    config.partition_count = value()?.parse().context("--partitions")?;
                }
                "--partition-threads" => {
                    config.partition_threads = value()?.parse().context("--partition-threads")?;
                }
                "--cluster-version" => {
                    config.cluster_version = value()?.parse().context("--cluster-version")?;
                }
                "--wan-consumers" => {
                    config.wan_consumers_file = Some(PathBuf::from(value()?));
                }
                "--log-level" => {
                    config.log_level = value()?
                        .parse()
                        .map_err(|_| anyhow::anyhow!("--log-level: unknown level"))?;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        config.bind_addr = bind_addr.context("--bind is required")?;

        if config.partition_count == 0 {
            anyhow::bail!("--partitions must be positive");
        }
        if config.partition_threads == 0 {
            anyhow::bail!("--partition-threads must be positive");
        }

        Ok(config)
    }
}

/// One entry of the WAN consumer bootstrap file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanConsumerEntry {
    pub wan_replication_name: String,
    pub consumer: WanConsumerConfig,
}

/// Parses the JSON bootstrap list of WAN consumers.
///
/// # Returns
/// * `Ok(entries)` in file order.
/// * `Err` if the JSON does not match the entry shape or an entry has an empty name.
pub fn parse_wan_consumers(json: &str) -> Result<Vec<WanConsumerEntry>> {
    let entries: Vec<WanConsumerEntry> =
        serde_json::from_str(json).context("invalid WAN consumer configuration")?;

    for entry in &entries {
        if entry.wan_replication_name.is_empty() {
            anyhow::bail!("WAN consumer entry without wan_replication_name");
        }
    }

    Ok(entries)
}

/// Reads and parses the bootstrap file at `path`.
pub fn load_wan_consumers(path: &Path) -> Result<Vec<WanConsumerEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_wan_consumers(&raw)
}
