//! The naming-service trait and shared resolver semantics.
//!
//! Each protocol (UNS, CNS, ZNS) implements [`NamingService`]; the trait
//! carries default implementations for the record-key conventions that are
//! identical across protocols (currency addresses, email) so resolvers only
//! implement the chain-specific fetch path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dns::{DnsRecord, DnsRecordType};
use crate::error::ResolutionError;
use crate::namehash::TokenId;
use crate::network::Network;
use crate::proxy_reader::{ProxyData, ProxyReader};

/// Identifies which protocol a resolver speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingServiceType {
    Uns,
    Cns,
    Zns,
}

impl std::fmt::Display for NamingServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NamingServiceType::Uns => "UNS",
            NamingServiceType::Cns => "CNS",
            NamingServiceType::Zns => "ZNS",
        };
        f.write_str(name)
    }
}

/// Reverse-lookup result for one owner address.
///
/// Registry queries can partially fail; `domains` holds what was found and
/// `failed_registries` names every registry that could not be consulted, so
/// callers can distinguish "owns nothing" from "one source was down".
#[derive(Debug, Default)]
pub struct OwnedDomains {
    pub domains: Vec<String>,
    pub failed_registries: Vec<RegistryFailure>,
}

/// One registry that failed during a reverse lookup.
#[derive(Debug)]
pub struct RegistryFailure {
    pub registry: String,
    pub error: ResolutionError,
}

/// A resolver for one naming protocol on one network.
#[async_trait]
pub trait NamingService: Send + Sync {
    /// Which protocol this resolver speaks.
    fn service_type(&self) -> NamingServiceType;

    /// The network this resolver targets, when its chain id is known.
    fn network(&self) -> Option<Network>;

    /// Whether this resolver handles the given domain name. Routing only;
    /// does not imply the domain is registered.
    async fn is_supported(&self, domain: &str) -> Result<bool, ResolutionError>;

    /// Hex-encoded namehash of a domain under this protocol's hash family.
    fn get_namehash(&self, domain: &str) -> String;

    /// Owner address of a domain.
    async fn get_owner(&self, domain: &str) -> Result<String, ResolutionError>;

    /// Value of a single record key.
    async fn get_record(&self, domain: &str, key: &str) -> Result<String, ResolutionError>;

    /// Crypto address for a currency ticker.
    ///
    /// Record key convention is `crypto.<TICKER>.address` with the ticker
    /// upper-cased. An unset record means the currency is unknown for this
    /// domain, not that the record is missing.
    async fn get_address(&self, domain: &str, ticker: &str) -> Result<String, ResolutionError> {
        let key = format!("crypto.{}.address", ticker.to_uppercase());
        match self.get_record(domain, &key).await {
            Err(ResolutionError::RecordNotFound { domain, .. }) => {
                Err(ResolutionError::UnknownCurrency {
                    domain,
                    ticker: ticker.to_string(),
                })
            }
            other => other,
        }
    }

    /// Content hash of the domain's IPFS-hosted site.
    async fn get_ipfs_hash(&self, domain: &str) -> Result<String, ResolutionError>;

    /// Owner email record.
    async fn get_email(&self, domain: &str) -> Result<String, ResolutionError> {
        self.get_record(domain, "whois.email.value").await
    }

    /// DNS records of the requested types.
    async fn get_dns(
        &self,
        domain: &str,
        types: &[DnsRecordType],
    ) -> Result<Vec<DnsRecord>, ResolutionError>;

    /// Owners for many domains in one round trip. Output order matches input
    /// order; unregistered domains map to `None`.
    async fn batch_owners(
        &self,
        domains: &[&str],
    ) -> Result<Vec<(String, Option<String>)>, ResolutionError>;

    /// All domains owned by an address across this protocol's registries.
    async fn get_tokens_owned_by(&self, owner: &str) -> Result<OwnedDomains, ResolutionError>;

    /// Metadata URI for a token.
    async fn get_token_uri(&self, token: TokenId) -> Result<String, ResolutionError>;

    /// Domain name a token id maps back to.
    async fn get_domain_name(&self, token: TokenId) -> Result<String, ResolutionError>;
}

/// Enforce the ownership precedence shared by the EVM resolvers.
///
/// No resolver and no owner means the domain was never registered; no
/// resolver with an owner means it is registered but cannot hold records.
pub(crate) fn check_ownership(
    data: &ProxyData,
    domain: &str,
    service: NamingServiceType,
) -> Result<(), ResolutionError> {
    if data.resolver.is_some() {
        return Ok(());
    }
    if data.owner.is_none() {
        Err(ResolutionError::UnregisteredDomain {
            domain: domain.to_string(),
            service,
        })
    } else {
        Err(ResolutionError::UnspecifiedResolver {
            domain: domain.to_string(),
            service,
        })
    }
}

/// Batched record fetch shared by the EVM resolvers: one `getData` round
/// trip, contract errors classified, ownership precedence enforced. Returns
/// one value slot per requested key, in key order.
pub(crate) async fn fetch_records(
    proxy: &ProxyReader,
    service: NamingServiceType,
    domain: &str,
    token: TokenId,
    keys: &[&str],
) -> Result<Vec<Option<String>>, ResolutionError> {
    let data = proxy
        .get_proxy_data(keys, token)
        .await
        .map_err(|e| ResolutionError::from_contract(e, service, domain, keys.first().copied()))?;
    check_ownership(&data, domain, service)?;
    Ok(data.values)
}
