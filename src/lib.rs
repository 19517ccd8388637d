//! Partition-Routed Client Dispatch Library
//!
//! A data node decodes client requests, authorises them, routes each one to the partition
//! that owns its target object, runs it there and encodes a typed response. Records shared
//! with clients and peers are encoded per negotiated protocol version so nodes on adjacent
//! versions keep interoperating during a rolling upgrade.
//!
//! ## Architecture Modules
//! - **`wire`**: big-endian primitive codec over `bytes`.
//! - **`versioning`**: protocol versions and version-gated record encoding.
//! - **`config`**: node settings and the `WanConsumerConfig` record.
//! - **`security`**: permission descriptors and the evaluator contract.
//! - **`partition`**: name hashing, managed services and the per-partition dispatcher.
//! - **`protocol`**: client frames and the error taxonomy.
//! - **`task`**: the decode → authorize → route → invoke → encode pipeline and its registry.
//! - **`scheduledexecutor`**: scheduled task bookkeeping and its partition-targeted requests.
//! - **`wan`**: WAN consumer configurations served at the client's record version.
//! - **`server`**: the node's HTTP surface.

pub mod config;
pub mod partition;
pub mod protocol;
pub mod scheduledexecutor;
pub mod security;
pub mod server;
pub mod task;
pub mod versioning;
pub mod wan;
pub mod wire;
