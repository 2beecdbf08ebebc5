//! factd - collector distribution and fact gathering
//!
//! Distributes small, independently-executable "collector" programs from a
//! central authority to a fleet of agents, verifies their integrity by
//! content hash, executes them locally, and aggregates their structured
//! output into a single fact set per node.
//!
//! # Architecture
//!
//! Three operations share one collector directory:
//! - the authority materializes its canonical collector set and serves it
//!   over a pull endpoint (`publisher`, `server`)
//! - any node scans the directory into a name → digest manifest declaring
//!   what it currently holds (`inventory`)
//! - any node executes every collector and folds their single-key JSON
//!   records into one fact set (`facts`)
//!
//! Reconciling an agent's inventory against the authority's manifest is the
//! registry's job; this crate only produces the manifests it needs and the
//! pull client (`fetch`) it acts through.
//!
//! # Usage
//!
//! ```bash
//! # Authority: publish and serve collectors
//! factd serve
//!
//! # Agent: what do I have?
//! factd inventory
//!
//! # Agent: what do my collectors say?
//! factd facts
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod facts;
pub mod fetch;
pub mod inventory;
pub mod publisher;
pub mod server;

// Re-export main types at crate root for convenience
pub use config::FactsConfig;
pub use error::FactsError;
pub use facts::FactSet;
pub use fetch::PullClient;
pub use inventory::CollectorManifest;
pub use server::CollectorServer;
