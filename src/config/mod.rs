//! Configuration Module
//!
//! - **`node`**: command-line settings of a data node and the JSON bootstrap file for WAN
//!   consumer configurations.
//! - **`wan_consumer`**: `WanConsumerConfig`, a versioned record exchanged between nodes and
//!   with clients.

pub mod node;
pub mod wan_consumer;

pub use node::{NodeConfig, WanConsumerEntry};
pub use wan_consumer::WanConsumerConfig;

#[cfg(test)]
mod tests;
