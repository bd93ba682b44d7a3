//! Proxy-reader contract facade.
//!
//! Typed wrapper over [`ContractClient`] for the batched-read proxy contract
//! shared by both UNS and CNS registry generations. The facade normalizes the
//! wire format's two "unset" encodings (empty string and zero address) to
//! `None` and never raises taxonomy errors itself; transport and codec
//! failures propagate unchanged for the resolver to classify.

use std::sync::Arc;

use crate::abi::Token;
use crate::contract::{ContractClient, PROXY_READER_ABI};
use crate::error::ContractError;
use crate::namehash::TokenId;
use crate::provider::JsonRpcProvider;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Result of one batched `getData` fetch.
///
/// `values` holds one entry per requested key, in request order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyData {
    pub resolver: Option<String>,
    pub owner: Option<String>,
    pub values: Vec<Option<String>>,
}

/// Typed facade over a proxy-reader contract.
#[derive(Clone)]
pub struct ProxyReader {
    client: ContractClient,
}

impl ProxyReader {
    pub fn new(address: impl Into<String>, provider: Arc<dyn JsonRpcProvider>) -> Self {
        Self {
            client: ContractClient::new(address, &PROXY_READER_ABI, provider),
        }
    }

    /// Handle to the underlying provider.
    pub fn provider(&self) -> Arc<dyn JsonRpcProvider> {
        self.client.provider()
    }

    /// Owner address for a token, `None` when unset.
    pub async fn get_owner(&self, token: TokenId) -> Result<Option<String>, ContractError> {
        let result = self.client.call_one("ownerOf", &[Token::Uint256(token.0)]).await?;
        Ok(result.and_then(Token::into_address).and_then(none_if_unset))
    }

    /// Single record value for a key, `None` when unset.
    pub async fn get_record(
        &self,
        key: &str,
        token: TokenId,
    ) -> Result<Option<String>, ContractError> {
        let result = self
            .client
            .call_one("get", &[Token::String(key.to_string()), Token::Uint256(token.0)])
            .await?;
        Ok(result.and_then(Token::into_string).and_then(none_if_unset))
    }

    /// Batched fetch: resolver, owner and one value per key, key order
    /// preserved.
    pub async fn get_proxy_data(
        &self,
        keys: &[&str],
        token: TokenId,
    ) -> Result<ProxyData, ContractError> {
        let key_tokens: Vec<Token> = keys
            .iter()
            .map(|k| Token::String((*k).to_string()))
            .collect();
        let mut tuple = self
            .client
            .call(
                "getData",
                &[Token::Array(key_tokens), Token::Uint256(token.0)],
            )
            .await?;

        if tuple.is_empty() {
            return Ok(ProxyData {
                resolver: None,
                owner: None,
                values: vec![None; keys.len()],
            });
        }
        if tuple.len() != 3 {
            return Err(malformed("getData", "expected a 3-element tuple"));
        }

        let values = tuple
            .pop()
            .and_then(Token::into_array)
            .ok_or_else(|| malformed("getData", "third element is not an array"))?;
        let owner = tuple
            .pop()
            .and_then(Token::into_address)
            .ok_or_else(|| malformed("getData", "second element is not an address"))?;
        let resolver = tuple
            .pop()
            .and_then(Token::into_address)
            .ok_or_else(|| malformed("getData", "first element is not an address"))?;

        if values.len() != keys.len() {
            return Err(malformed("getData", "value count does not match key count"));
        }
        let values = values
            .into_iter()
            .map(|t| t.into_string().and_then(none_if_unset))
            .collect();

        Ok(ProxyData {
            resolver: none_if_unset(resolver),
            owner: none_if_unset(owner),
            values,
        })
    }

    /// Owners for many tokens, input order preserved, `None` per unset.
    pub async fn batch_owners(
        &self,
        tokens: &[TokenId],
    ) -> Result<Vec<Option<String>>, ContractError> {
        let ids: Vec<Token> = tokens.iter().map(|t| Token::Uint256(t.0)).collect();
        let result = self
            .client
            .call_one("ownerOfForMany", &[Token::Array(ids)])
            .await?;

        let owners = match result.and_then(Token::into_array) {
            Some(owners) => owners,
            None => return Ok(vec![None; tokens.len()]),
        };
        if owners.len() != tokens.len() {
            return Err(malformed(
                "ownerOfForMany",
                "owner count does not match token count",
            ));
        }
        Ok(owners
            .into_iter()
            .map(|t| t.into_address().and_then(none_if_unset))
            .collect())
    }

    /// Whether a token has been minted under this proxy.
    pub async fn get_exists(&self, token: TokenId) -> Result<bool, ContractError> {
        let result = self.client.call_one("exists", &[Token::Uint256(token.0)]).await?;
        Ok(result.and_then(Token::into_bool).unwrap_or(false))
    }

    /// Metadata URI for a token, `None` when unset.
    pub async fn get_token_uri(&self, token: TokenId) -> Result<Option<String>, ContractError> {
        let result = self
            .client
            .call_one("tokenURI", &[Token::Uint256(token.0)])
            .await?;
        Ok(result.and_then(Token::into_string).and_then(none_if_unset))
    }

    /// Which registry generation minted this token, `None` when unknown.
    pub async fn registry_of(&self, token: TokenId) -> Result<Option<String>, ContractError> {
        let result = self
            .client
            .call_one("registryOf", &[Token::Uint256(token.0)])
            .await?;
        Ok(result.and_then(Token::into_address).and_then(none_if_unset))
    }
}

/// Collapse both wire encodings of "unset" into `None`.
fn none_if_unset(value: String) -> Option<String> {
    if value.is_empty() || value == ZERO_ADDRESS {
        None
    } else {
        Some(value)
    }
}

fn malformed(method: &str, reason: &str) -> ContractError {
    ContractError::MalformedResult {
        method: method.to_string(),
        reason: reason.to_string(),
    }
}
