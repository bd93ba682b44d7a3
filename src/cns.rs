//! CNS resolver.
//!
//! Legacy `.crypto` registry generation, read through the CNS proxy reader.
//! Record semantics are identical to [`crate::uns`]; routing and the
//! reverse-lookup surface differ: CNS owns exactly the `crypto` top-level
//! label and has no registry reverse lookups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dns::{self, DnsRecord, DnsRecordType};
use crate::error::ResolutionError;
use crate::namehash::{eth_namehash, TokenId};
use crate::network::NsConfig;
use crate::provider::{HttpProvider, JsonRpcProvider};
use crate::proxy_reader::ProxyReader;
use crate::service::{self, NamingService, NamingServiceType, OwnedDomains};

const IPFS_KEYS: [&str; 2] = ["dweb.ipfs.hash", "ipfs.html.value"];

/// Resolver for `.crypto` domains minted under the legacy registry.
pub struct CnsResolver {
    config: NsConfig,
    proxy: ProxyReader,
}

impl CnsResolver {
    /// Build a resolver backed by an HTTP provider at the configured URL.
    pub fn new(config: NsConfig) -> Self {
        let provider = Arc::new(HttpProvider::new(config.provider_url.clone()));
        Self::with_provider(config, provider)
    }

    /// Build a resolver over an explicit provider.
    pub fn with_provider(config: NsConfig, provider: Arc<dyn JsonRpcProvider>) -> Self {
        let proxy = ProxyReader::new(config.contract_address.clone(), provider);
        Self { config, proxy }
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &NsConfig {
        &self.config
    }

    fn classify(&self, err: crate::error::ContractError, domain: &str, key: Option<&str>) -> ResolutionError {
        ResolutionError::from_contract(err, NamingServiceType::Cns, domain, key)
    }
}

#[async_trait]
impl NamingService for CnsResolver {
    fn service_type(&self) -> NamingServiceType {
        NamingServiceType::Cns
    }

    fn network(&self) -> Option<crate::network::Network> {
        self.config.network()
    }

    async fn is_supported(&self, domain: &str) -> Result<bool, ResolutionError> {
        Ok(domain.rsplit('.').next() == Some("crypto"))
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
            service: NamingServiceType::Cns,
        })
    }

    async fn get_record(&self, domain: &str, key: &str) -> Result<String, ResolutionError> {
        let token = eth_namehash(domain);
        let mut values =
            service::fetch_records(&self.proxy, NamingServiceType::Cns, domain, token, &[key])
                .await?;
        values
            .pop()
            .flatten()
            .ok_or_else(|| ResolutionError::RecordNotFound {
                domain: domain.to_string(),
                key: key.to_string(),
                service: NamingServiceType::Cns,
            })
    }

    async fn get_ipfs_hash(&self, domain: &str) -> Result<String, ResolutionError> {
        let token = eth_namehash(domain);
        let values = service::fetch_records(
            &self.proxy,
            NamingServiceType::Cns,
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
                service: NamingServiceType::Cns,
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
            NamingServiceType::Cns,
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

    async fn get_tokens_owned_by(&self, _owner: &str) -> Result<OwnedDomains, ResolutionError> {
        Err(ResolutionError::NotImplemented {
            method: "get_tokens_owned_by",
            service: NamingServiceType::Cns,
        })
    }

    async fn get_token_uri(&self, _token: TokenId) -> Result<String, ResolutionError> {
        Err(ResolutionError::NotImplemented {
            method: "get_token_uri",
            service: NamingServiceType::Cns,
        })
    }

    async fn get_domain_name(&self, _token: TokenId) -> Result<String, ResolutionError> {
        Err(ResolutionError::NotImplemented {
            method: "get_domain_name",
            service: NamingServiceType::Cns,
        })
    }
}
