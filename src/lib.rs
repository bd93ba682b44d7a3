//! Blockchain domain-name resolution.
//!
//! Resolves human-readable domain names (`alice.crypto`, `bob.zil`, and the
//! open-ended set of UNS top-level labels) into on-chain records by querying
//! smart-contract state across three naming protocols:
//!
//! - [`UnsResolver`] — the current unified registry generation, read through
//!   an Ethereum-style proxy-reader contract,
//! - [`CnsResolver`] — the legacy `.crypto` registry generation,
//! - [`ZnsResolver`] — Zilliqa naming, read via raw contract sub-state
//!   queries.
//!
//! All resolvers implement the [`NamingService`] trait and surface the closed
//! [`ResolutionError`] taxonomy. The crate is read-only: no registration, no
//! record updates, no caching; all reads are at the latest block.
//!
//! ```no_run
//! use domain_resolution::{NamingService, NsConfig, UnsResolver};
//! use domain_resolution::network::contract_addresses;
//!
//! # async fn example() -> Result<(), domain_resolution::ResolutionError> {
//! let resolver = UnsResolver::new(NsConfig::new(
//!     1,
//!     "https://mainnet.infura.io/v3/<project>",
//!     contract_addresses::UNS_PROXY_READER,
//! ));
//! let address = resolver.get_address("brad.crypto", "eth").await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod cns;
pub mod contract;
pub mod dns;
pub mod error;
pub mod namehash;
pub mod network;
pub mod provider;
pub mod proxy_reader;
pub mod registry;
pub mod service;
pub mod uns;
pub mod zns;

pub use cns::CnsResolver;
pub use dns::{DnsRecord, DnsRecordType, DEFAULT_DNS_TTL};
pub use error::ResolutionError;
pub use namehash::{eth_namehash, zil_namehash, TokenId};
pub use network::{Network, NsConfig};
pub use provider::{HttpProvider, JsonRpcProvider};
pub use service::{NamingService, NamingServiceType, OwnedDomains, RegistryFailure};
pub use uns::UnsResolver;
pub use zns::ZnsResolver;
