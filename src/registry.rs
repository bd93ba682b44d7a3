//! Registry contract facade.
//!
//! Reverse lookups against one registry generation: which tokens an address
//! owns, and which domain name a token id maps back to. Same contract as
//! [`crate::proxy_reader`]: unset values become `None`, failures propagate
//! unclassified.

use std::sync::Arc;

use crate::abi::Token;
use crate::contract::{ContractClient, REGISTRY_ABI};
use crate::error::ContractError;
use crate::namehash::TokenId;
use crate::provider::JsonRpcProvider;

/// Typed facade over a registry contract.
#[derive(Clone)]
pub struct Registry {
    client: ContractClient,
}

impl Registry {
    pub fn new(address: impl Into<String>, provider: Arc<dyn JsonRpcProvider>) -> Self {
        Self {
            client: ContractClient::new(address, &REGISTRY_ABI, provider),
        }
    }

    /// The registry contract address.
    pub fn address(&self) -> &str {
        self.client.address()
    }

    /// Domains owned by an address under this registry.
    pub async fn get_tokens_owned_by(&self, owner: &str) -> Result<Vec<String>, ContractError> {
        let result = self
            .client
            .call_one("getTokensOwnedBy", &[Token::Address(owner.to_string())])
            .await?;

        let items = match result.and_then(Token::into_array) {
            Some(items) => items,
            None => return Ok(Vec::new()),
        };
        items
            .into_iter()
            .map(|t| {
                t.into_string().ok_or_else(|| ContractError::MalformedResult {
                    method: "getTokensOwnedBy".to_string(),
                    reason: "element is not a string".to_string(),
                })
            })
            .collect()
    }

    /// Domain name for a token id, `None` when this registry has no entry.
    pub async fn get_domain_name(&self, token: TokenId) -> Result<Option<String>, ContractError> {
        let result = self
            .client
            .call_one("getDomainName", &[Token::Uint256(token.0)])
            .await?;
        Ok(result
            .and_then(Token::into_string)
            .filter(|s| !s.is_empty()))
    }
}
