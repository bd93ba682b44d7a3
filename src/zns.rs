//! ZNS resolver.
//!
//! Zilliqa naming. Instead of ABI-encoded `eth_call`s, state is read with the
//! Zilliqa `GetSmartContractSubState` API: the registry contract's `records`
//! field maps namehashes to `(owner, resolver)` pairs, and the resolver
//! contract's `records` field is the flat key/value record map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::dns::{DnsRecord, DnsRecordType};
use crate::error::{ProviderError, ResolutionError};
use crate::namehash::{zil_namehash, TokenId};
use crate::network::NsConfig;
use crate::provider::{HttpProvider, JsonRpcProvider};
use crate::service::{NamingService, NamingServiceType, OwnedDomains};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Resolver for `.zil` domains on the Zilliqa chain.
pub struct ZnsResolver {
    config: NsConfig,
    provider: Arc<dyn JsonRpcProvider>,
}

impl ZnsResolver {
    /// Build a resolver backed by an HTTP provider at the configured URL.
    pub fn new(config: NsConfig) -> Self {
        let provider = Arc::new(HttpProvider::new(config.provider_url.clone()));
        Self::with_provider(config, provider)
    }

    /// Build a resolver over an explicit provider.
    pub fn with_provider(config: NsConfig, provider: Arc<dyn JsonRpcProvider>) -> Self {
        Self { config, provider }
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &NsConfig {
        &self.config
    }

    /// All records set on a domain's resolver contract.
    pub async fn get_all_records(
        &self,
        domain: &str,
    ) -> Result<HashMap<String, String>, ResolutionError> {
        let resolver = self.require_resolver(domain).await?;
        self.resolver_records(&resolver, domain).await
    }

    /// One `GetSmartContractSubState` query. Addresses go over the wire
    /// without the `0x` prefix, lower-cased.
    async fn sub_state(
        &self,
        address: &str,
        field: &str,
        keys: &[&str],
        domain: &str,
    ) -> Result<Value, ResolutionError> {
        let address = address.trim_start_matches("0x").to_lowercase();
        let params = json!([address, field, keys]);
        self.provider
            .request("GetSmartContractSubState", params)
            .await
            .map_err(|err| match err {
                source @ ProviderError::Unreachable(_) => ResolutionError::BlockchainIsDown {
                    service: NamingServiceType::Zns,
                    source,
                },
                other => ResolutionError::UnknownError {
                    domain: domain.to_string(),
                    service: NamingServiceType::Zns,
                    source: Some(Box::new(other)),
                },
            })
    }

    /// The registry's `(owner, resolver)` pair for a domain, or
    /// [`ResolutionError::UnregisteredDomain`] when the registry has no
    /// entry at the domain's namehash.
    async fn registry_record(
        &self,
        domain: &str,
    ) -> Result<(Option<String>, Option<String>), ResolutionError> {
        let token = zil_namehash(domain).to_hex();
        let state = self
            .sub_state(&self.config.contract_address, "records", &[&token], domain)
            .await?;

        let arguments = state
            .get("records")
            .and_then(|records| records.get(&token))
            .and_then(|entry| entry.get("arguments"))
            .and_then(Value::as_array);
        let Some(arguments) = arguments else {
            return Err(self.unregistered(domain));
        };

        let field = |index: usize| {
            arguments
                .get(index)
                .and_then(Value::as_str)
                .map(str::to_string)
                .and_then(none_if_unset)
        };
        Ok((field(0), field(1)))
    }

    /// Resolver address for a domain, enforcing the ownership precedence.
    async fn require_resolver(&self, domain: &str) -> Result<String, ResolutionError> {
        let (owner, resolver) = self.registry_record(domain).await?;
        match resolver {
            Some(resolver) => Ok(resolver),
            None if owner.is_none() => Err(self.unregistered(domain)),
            None => Err(ResolutionError::UnspecifiedResolver {
                domain: domain.to_string(),
                service: NamingServiceType::Zns,
            }),
        }
    }

    /// The flat record map held by a resolver contract.
    async fn resolver_records(
        &self,
        resolver: &str,
        domain: &str,
    ) -> Result<HashMap<String, String>, ResolutionError> {
        let state = self.sub_state(resolver, "records", &[], domain).await?;
        let map = state
            .get("records")
            .and_then(Value::as_object)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        Ok(map)
    }

    fn unregistered(&self, domain: &str) -> ResolutionError {
        ResolutionError::UnregisteredDomain {
            domain: domain.to_string(),
            service: NamingServiceType::Zns,
        }
    }

    fn not_implemented(&self, method: &'static str) -> ResolutionError {
        ResolutionError::NotImplemented {
            method,
            service: NamingServiceType::Zns,
        }
    }
}

#[async_trait]
impl NamingService for ZnsResolver {
    fn service_type(&self) -> NamingServiceType {
        NamingServiceType::Zns
    }

    fn network(&self) -> Option<crate::network::Network> {
        self.config.network()
    }

    async fn is_supported(&self, domain: &str) -> Result<bool, ResolutionError> {
        Ok(domain.rsplit('.').next() == Some("zil"))
    }

    fn get_namehash(&self, domain: &str) -> String {
        zil_namehash(domain).to_hex()
    }

    async fn get_owner(&self, domain: &str) -> Result<String, ResolutionError> {
        let (owner, _) = self.registry_record(domain).await?;
        owner.ok_or_else(|| self.unregistered(domain))
    }

    async fn get_record(&self, domain: &str, key: &str) -> Result<String, ResolutionError> {
        let records = self.get_all_records(domain).await?;
        records
            .get(key)
            .cloned()
            .ok_or_else(|| ResolutionError::RecordNotFound {
                domain: domain.to_string(),
                key: key.to_string(),
                service: NamingServiceType::Zns,
            })
    }

    async fn get_ipfs_hash(&self, domain: &str) -> Result<String, ResolutionError> {
        self.get_record(domain, "ipfs.html.value").await
    }

    async fn get_dns(
        &self,
        _domain: &str,
        _types: &[DnsRecordType],
    ) -> Result<Vec<DnsRecord>, ResolutionError> {
        Err(self.not_implemented("get_dns"))
    }

    /// No batched read exists on the Zilliqa side; owners are fetched one
    /// registry query per domain, input order preserved.
    async fn batch_owners(
        &self,
        domains: &[&str],
    ) -> Result<Vec<(String, Option<String>)>, ResolutionError> {
        let mut owners = Vec::with_capacity(domains.len());
        for domain in domains {
            let owner = match self.registry_record(domain).await {
                Ok((owner, _)) => owner,
                Err(ResolutionError::UnregisteredDomain { .. }) => None,
                Err(other) => return Err(other),
            };
            owners.push(((*domain).to_string(), owner));
        }
        Ok(owners)
    }

    async fn get_tokens_owned_by(&self, _owner: &str) -> Result<OwnedDomains, ResolutionError> {
        Err(self.not_implemented("get_tokens_owned_by"))
    }

    async fn get_token_uri(&self, _token: TokenId) -> Result<String, ResolutionError> {
        Err(self.not_implemented("get_token_uri"))
    }

    async fn get_domain_name(&self, _token: TokenId) -> Result<String, ResolutionError> {
        Err(self.not_implemented("get_domain_name"))
    }
}

fn none_if_unset(value: String) -> Option<String> {
    if value.is_empty() || value == ZERO_ADDRESS {
        None
    } else {
        Some(value)
    }
}
