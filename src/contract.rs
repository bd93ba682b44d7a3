//! Generic contract call dispatch.
//!
//! A [`ContractClient`] binds a contract address, a JSON-RPC provider and a
//! [`MethodCatalog`] of known method signatures. Calls are resolved by
//! method name and argument count, encoded through the ABI codec, sent as
//! `eth_call`, and decoded against the catalogued return tuple.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::json;

use crate::abi::{self, ParamType, Token};
use crate::error::ContractError;
use crate::provider::JsonRpcProvider;

/// One catalogued contract method.
#[derive(Clone, Debug)]
pub struct MethodAbi {
    pub name: &'static str,
    pub inputs: Vec<ParamType>,
    pub outputs: Vec<ParamType>,
}

/// Method registry keyed by `(name, arity)`.
///
/// Registration rejects collisions, so lookup can never hit an ambiguous
/// overload at call time.
#[derive(Debug, Default)]
pub struct MethodCatalog {
    methods: HashMap<(String, usize), MethodAbi>,
}

impl MethodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method. Fails if a method with the same name and argument count
    /// is already registered.
    pub fn register(&mut self, method: MethodAbi) -> Result<(), ContractError> {
        let key = (method.name.to_string(), method.inputs.len());
        if self.methods.contains_key(&key) {
            return Err(ContractError::DuplicateMethod {
                method: method.name.to_string(),
                arity: method.inputs.len(),
            });
        }
        self.methods.insert(key, method);
        Ok(())
    }

    fn get(&self, name: &str, arity: usize) -> Option<&MethodAbi> {
        self.methods.get(&(name.to_string(), arity))
    }
}

/// Shared catalog for both proxy-reader contract generations.
pub static PROXY_READER_ABI: Lazy<MethodCatalog> = Lazy::new(|| {
    let mut catalog = MethodCatalog::new();
    let entries = [
        MethodAbi {
            name: "ownerOf",
            inputs: vec![ParamType::Uint256],
            outputs: vec![ParamType::Address],
        },
        MethodAbi {
            name: "get",
            inputs: vec![ParamType::String, ParamType::Uint256],
            outputs: vec![ParamType::String],
        },
        MethodAbi {
            name: "getData",
            inputs: vec![
                ParamType::Array(Box::new(ParamType::String)),
                ParamType::Uint256,
            ],
            outputs: vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Array(Box::new(ParamType::String)),
            ],
        },
        MethodAbi {
            name: "ownerOfForMany",
            inputs: vec![ParamType::Array(Box::new(ParamType::Uint256))],
            outputs: vec![ParamType::Array(Box::new(ParamType::Address))],
        },
        MethodAbi {
            name: "exists",
            inputs: vec![ParamType::Uint256],
            outputs: vec![ParamType::Bool],
        },
        MethodAbi {
            name: "tokenURI",
            inputs: vec![ParamType::Uint256],
            outputs: vec![ParamType::String],
        },
        MethodAbi {
            name: "registryOf",
            inputs: vec![ParamType::Uint256],
            outputs: vec![ParamType::Address],
        },
    ];
    for entry in entries {
        catalog
            .register(entry)
            .expect("proxy reader catalog has unique (name, arity) keys");
    }
    catalog
});

/// Catalog for the registry contracts' reverse-lookup surface.
pub static REGISTRY_ABI: Lazy<MethodCatalog> = Lazy::new(|| {
    let mut catalog = MethodCatalog::new();
    let entries = [
        MethodAbi {
            name: "getTokensOwnedBy",
            inputs: vec![ParamType::Address],
            outputs: vec![ParamType::Array(Box::new(ParamType::String))],
        },
        MethodAbi {
            name: "getDomainName",
            inputs: vec![ParamType::Uint256],
            outputs: vec![ParamType::String],
        },
    ];
    for entry in entries {
        catalog
            .register(entry)
            .expect("registry catalog has unique (name, arity) keys");
    }
    catalog
});

/// Generic read-only contract client.
#[derive(Clone)]
pub struct ContractClient {
    address: String,
    catalog: &'static Lazy<MethodCatalog>,
    provider: Arc<dyn JsonRpcProvider>,
}

impl ContractClient {
    pub fn new(
        address: impl Into<String>,
        catalog: &'static Lazy<MethodCatalog>,
        provider: Arc<dyn JsonRpcProvider>,
    ) -> Self {
        Self {
            address: address.into(),
            catalog,
            provider,
        }
    }

    /// The contract address this client calls.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Handle to the underlying provider, for building sibling clients on
    /// the same transport.
    pub fn provider(&self) -> Arc<dyn JsonRpcProvider> {
        self.provider.clone()
    }

    /// Invoke a catalogued method and decode the return tuple.
    ///
    /// A raw `"0x"` result is the node saying "no data at this address" and
    /// decodes to an empty tuple, not an error.
    pub async fn call(&self, method: &str, args: &[Token]) -> Result<Vec<Token>, ContractError> {
        let abi = self
            .catalog
            .get(method, args.len())
            .ok_or_else(|| ContractError::MethodNotFound {
                method: method.to_string(),
                arity: args.len(),
            })?;

        let data = abi::encode_call(abi.name, &abi.inputs, args).map_err(|source| {
            ContractError::Abi {
                method: method.to_string(),
                source,
            }
        })?;

        let params = json!([
            { "data": format!("0x{}", hex::encode(&data)), "to": self.address },
            "latest",
        ]);
        let result = self.provider.request("eth_call", params).await?;

        let raw = result
            .as_str()
            .ok_or_else(|| ContractError::MalformedResult {
                method: method.to_string(),
                reason: "result is not a hex string".to_string(),
            })?;
        if raw == "0x" {
            return Ok(Vec::new());
        }

        let bytes =
            hex::decode(raw.trim_start_matches("0x")).map_err(|e| ContractError::Abi {
                method: method.to_string(),
                source: e.into(),
            })?;
        abi::decode_tuple(&abi.outputs, &bytes).map_err(|source| ContractError::Abi {
            method: method.to_string(),
            source,
        })
    }

    /// Invoke a method and return the first element of the tuple, or `None`
    /// when the tuple is empty. Callers must treat `None` as "value absent",
    /// distinct from an error.
    pub async fn call_one(
        &self,
        method: &str,
        args: &[Token],
    ) -> Result<Option<Token>, ContractError> {
        Ok(self.call(method, args).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use serde_json::Value;

    struct StaticProvider {
        result: Value,
    }

    #[async_trait]
    impl JsonRpcProvider for StaticProvider {
        async fn request(&self, _method: &str, _params: Value) -> Result<Value, ProviderError> {
            Ok(self.result.clone())
        }
    }

    fn client_with_result(result: Value) -> ContractClient {
        ContractClient::new(
            "0x7ea9Ee21077F84339eDa9C80048ec6db678642B1",
            &PROXY_READER_ABI,
            Arc::new(StaticProvider { result }),
        )
    }

    #[test]
    fn catalog_rejects_arity_collision() {
        let mut catalog = MethodCatalog::new();
        catalog
            .register(MethodAbi {
                name: "ownerOf",
                inputs: vec![ParamType::Uint256],
                outputs: vec![ParamType::Address],
            })
            .unwrap();
        let err = catalog
            .register(MethodAbi {
                name: "ownerOf",
                inputs: vec![ParamType::Uint256],
                outputs: vec![ParamType::String],
            })
            .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateMethod { .. }));
    }

    #[test]
    fn catalog_allows_same_name_different_arity() {
        let mut catalog = MethodCatalog::new();
        catalog
            .register(MethodAbi {
                name: "get",
                inputs: vec![ParamType::String, ParamType::Uint256],
                outputs: vec![ParamType::String],
            })
            .unwrap();
        catalog
            .register(MethodAbi {
                name: "get",
                inputs: vec![ParamType::String],
                outputs: vec![ParamType::String],
            })
            .unwrap();
        assert!(catalog.get("get", 1).is_some());
        assert!(catalog.get("get", 2).is_some());
    }

    #[tokio::test]
    async fn unknown_method_fails_before_any_rpc() {
        let client = client_with_result(Value::Null);
        let err = client.call("noSuchMethod", &[]).await.unwrap_err();
        assert!(matches!(err, ContractError::MethodNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_sentinel_decodes_to_empty_tuple() {
        let client = client_with_result(Value::String("0x".to_string()));
        let tokens = client
            .call("ownerOf", &[Token::Uint256([0u8; 32])])
            .await
            .unwrap();
        assert!(tokens.is_empty());

        let first = client
            .call_one("ownerOf", &[Token::Uint256([0u8; 32])])
            .await
            .unwrap();
        assert!(first.is_none());
    }

    #[tokio::test]
    async fn address_result_decodes() {
        let mut payload = vec![0u8; 32];
        payload[12..].copy_from_slice(&[0x8a; 20]);
        let client = client_with_result(Value::String(format!("0x{}", hex::encode(payload))));
        let first = client
            .call_one("ownerOf", &[Token::Uint256([0u8; 32])])
            .await
            .unwrap();
        assert_eq!(
            first.and_then(Token::into_address).as_deref(),
            Some("0x8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a")
        );
    }
}
