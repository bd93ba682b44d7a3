//! UNS resolver.
//!
//! Current registry generation. Routing is dynamic: any top-level label the
//! proxy reader reports as minted (except `zil`) belongs here. The reverse
//! lookup consults both the UNS and the legacy CNS registry concurrently and
//! reports per-registry failures instead of discarding partial results.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::dns::{self, DnsRecord, DnsRecordType};
use crate::error::{ContractError, ResolutionError};
use crate::namehash::{eth_namehash, TokenId};
use crate::network::{contract_addresses, NsConfig};
use crate::provider::{HttpProvider, JsonRpcProvider};
use crate::proxy_reader::ProxyReader;
use crate::registry::Registry;
use crate::service::{
    self, NamingService, NamingServiceType, OwnedDomains, RegistryFailure,
};

const IPFS_KEYS: [&str; 2] = ["dweb.ipfs.hash", "ipfs.html.value"];

/// Resolver for domains minted under the UNS registry generation.
pub struct UnsResolver {
    config: NsConfig,
    proxy: ProxyReader,
    registries: Vec<Registry>,
}

impl UnsResolver {
    /// Build a resolver backed by an HTTP provider at the configured URL,
    /// consulting the mainnet UNS and CNS registries for reverse lookups.
    pub fn new(config: NsConfig) -> Self {
        let provider = Arc::new(HttpProvider::new(config.provider_url.clone()));
        Self::with_provider(config, provider)
    }

    /// Build a resolver over an explicit provider and the default registries.
    pub fn with_provider(config: NsConfig, provider: Arc<dyn JsonRpcProvider>) -> Self {
        Self::with_registries(
            config,
            provider,
            &[
                contract_addresses::UNS_REGISTRY,
                contract_addresses::CNS_REGISTRY,
            ],
        )
    }

    /// Build a resolver over an explicit provider and registry set.
    pub fn with_registries(
        config: NsConfig,
        provider: Arc<dyn JsonRpcProvider>,
        registry_addresses: &[&str],
    ) -> Self {
        let proxy = ProxyReader::new(config.contract_address.clone(), provider.clone());
        let registries = registry_addresses
            .iter()
            .map(|addr| Registry::new(*addr, provider.clone()))
            .collect();
        Self {
            config,
            proxy,
            registries,
        }
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &NsConfig {
        &self.config
    }

    fn classify(&self, err: ContractError, domain: &str, key: Option<&str>) -> ResolutionError {
        ResolutionError::from_contract(err, NamingServiceType::Uns, domain, key)
    }
}

#[async_trait]
impl NamingService for UnsResolver {
    fn service_type(&self) -> NamingServiceType {
        NamingServiceType::Uns
    }

    fn network(&self) -> Option<crate::network::Network> {
        self.config.network()
    }

    /// A domain routes here when its top-level label is minted as a UNS
    /// token. The `zil` label is carved out for ZNS regardless.
    async fn is_supported(&self, domain: &str) -> Result<bool, ResolutionError> {
        let Some(tld) = domain.rsplit('.').next().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        if tld == "zil" {
            return Ok(false);
        }
        self.proxy
            .get_exists(eth_namehash(tld))
            .await
            .map_err(|e| self.classify(e, domain, None))
    }

    fn get_namehash(&self, domain: &str) -> String {
        eth_namehash(domain).to_hex()
    }

    async fn get_owner(&self, domain: &str) -> Result<String, ResolutionError> {
        let token = eth_namehash(domain);
        let owner = self
            .proxy
            .get_owner(token)
            .await
            .map_err(|e| self.classify(e, domain, None))?;
        owner.ok_or_else(|| ResolutionError::UnregisteredDomain {
            domain: domain.to_string(),
            service: NamingServiceType::Uns,
        })
    }

    async fn get_record(&self, domain: &str, key: &str) -> Result<String, ResolutionError> {
        let token = eth_namehash(domain);
        let mut values =
            service::fetch_records(&self.proxy, NamingServiceType::Uns, domain, token, &[key])
                .await?;
        values
            .pop()
            .flatten()
            .ok_or_else(|| ResolutionError::RecordNotFound {
                domain: domain.to_string(),
                key: key.to_string(),
                service: NamingServiceType::Uns,
            })
    }

    /// Prefers the modern `dweb.ipfs.hash` key, falling back to the legacy
    /// `ipfs.html.value`, in one batched read.
    async fn get_ipfs_hash(&self, domain: &str) -> Result<String, ResolutionError> {
        let token = eth_namehash(domain);
        let values = service::fetch_records(
            &self.proxy,
            NamingServiceType::Uns,
            domain,
            token,
            &IPFS_KEYS,
        )
        .await?;
        values
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ResolutionError::RecordNotFound {
                domain: domain.to_string(),
                key: IPFS_KEYS[0].to_string(),
                service: NamingServiceType::Uns,
            })
    }

    async fn get_dns(
        &self,
        domain: &str,
        types: &[DnsRecordType],
    ) -> Result<Vec<DnsRecord>, ResolutionError> {
        let token = eth_namehash(domain);
        let keys = dns::record_keys(types);
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let values = service::fetch_records(
            &self.proxy,
            NamingServiceType::Uns,
            domain,
            token,
            &key_refs,
        )
        .await?;

        let raw: HashMap<String, String> = keys
            .into_iter()
            .zip(values)
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        Ok(dns::build_records(&raw, types))
    }

    async fn batch_owners(
        &self,
        domains: &[&str],
    ) -> Result<Vec<(String, Option<String>)>, ResolutionError> {
        let tokens: Vec<TokenId> = domains.iter().map(|d| eth_namehash(d)).collect();
        let owners = self
            .proxy
            .batch_owners(&tokens)
            .await
            .map_err(|e| self.classify(e, &domains.join(","), None))?;
        Ok(domains
            .iter()
            .map(|d| (*d).to_string())
            .zip(owners)
            .collect())
    }

    /// Query every registry concurrently; registries that fail are reported
    /// in [`OwnedDomains::failed_registries`] instead of poisoning the whole
    /// result. Candidate domains are verified against their current on-chain
    /// owner before being returned.
    async fn get_tokens_owned_by(&self, owner: &str) -> Result<OwnedDomains, ResolutionError> {
        let mut handles = Vec::with_capacity(self.registries.len());
        for registry in &self.registries {
            let registry = registry.clone();
            let address = registry.address().to_string();
            let owner = owner.to_string();
            let handle =
                tokio::spawn(async move { registry.get_tokens_owned_by(&owner).await });
            handles.push((address, handle));
        }

        let mut candidates: Vec<String> = Vec::new();
        let mut failed_registries = Vec::new();
        for (address, handle) in handles {
            match handle.await {
                Ok(Ok(domains)) => candidates.extend(domains),
                Ok(Err(err)) => {
                    warn!(registry = %address, error = %err, "registry reverse lookup failed");
                    failed_registries.push(RegistryFailure {
                        registry: address,
                        error: self.classify(err, owner, None),
                    });
                }
                Err(join_err) => {
                    warn!(registry = %address, "registry lookup task failed");
                    failed_registries.push(RegistryFailure {
                        registry: address,
                        error: ResolutionError::UnknownError {
                            domain: owner.to_string(),
                            service: NamingServiceType::Uns,
                            source: Some(Box::new(join_err)),
                        },
                    });
                }
            }
        }

        candidates.sort();
        candidates.dedup();
        if candidates.is_empty() {
            return Ok(OwnedDomains {
                domains: Vec::new(),
                failed_registries,
            });
        }

        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let verified = self.batch_owners(&refs).await?;
        let domains = verified
            .into_iter()
            .filter_map(|(domain, current)| {
                current
                    .filter(|c| c.eq_ignore_ascii_case(owner))
                    .map(|_| domain)
            })
            .collect();

        Ok(OwnedDomains {
            domains,
            failed_registries,
        })
    }

    async fn get_token_uri(&self, token: TokenId) -> Result<String, ResolutionError> {
        let uri = self
            .proxy
            .get_token_uri(token)
            .await
            .map_err(|e| self.classify(e, &token.to_hex(), None))?;
        uri.ok_or_else(|| ResolutionError::UnregisteredDomain {
            domain: token.to_hex(),
            service: NamingServiceType::Uns,
        })
    }

    /// Find the registry that minted the token, then ask it for the name.
    async fn get_domain_name(&self, token: TokenId) -> Result<String, ResolutionError> {
        let registry_address = self
            .proxy
            .registry_of(token)
            .await
            .map_err(|e| self.classify(e, &token.to_hex(), None))?
            .ok_or_else(|| ResolutionError::UnregisteredDomain {
                domain: token.to_hex(),
                service: NamingServiceType::Uns,
            })?;

        let registry = self
            .registries
            .iter()
            .find(|r| r.address().eq_ignore_ascii_case(&registry_address))
            .cloned()
            .unwrap_or_else(|| {
                Registry::new(registry_address.clone(), self.proxy.provider())
            });

        let name = registry
            .get_domain_name(token)
            .await
            .map_err(|e| self.classify(e, &token.to_hex(), None))?;
        name.ok_or_else(|| ResolutionError::UnregisteredDomain {
            domain: token.to_hex(),
            service: NamingServiceType::Uns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::contract_addresses::UNS_PROXY_READER;

    #[test]
    fn namehash_uses_keccak_family() {
        let resolver = UnsResolver::new(NsConfig::new(
            1,
            "https://mainnet.infura.io/v3/none",
            UNS_PROXY_READER,
        ));
        assert_eq!(
            resolver.get_namehash("beresnev.crypto"),
            "0x29bf1b111e709f0953848df35e419490fbad5d316690e4de61adc52695ddf9f3"
        );
    }
}
