//! Error types for domain resolution.
//!
//! Two layers: the public [`ResolutionError`] taxonomy that every resolver
//! operation surfaces, and the internal transport/codec errors
//! ([`ProviderError`], [`AbiError`], [`ContractError`]) that are caught once
//! at the resolver boundary and classified into the taxonomy.

use thiserror::Error;

use crate::service::NamingServiceType;

/// Closed error taxonomy surfaced by every public resolver operation.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Domain has neither an owner nor a resolver on chain.
    #[error("domain {domain} is not registered ({service})")]
    UnregisteredDomain {
        domain: String,
        service: NamingServiceType,
    },

    /// Domain is owned and resolvable but carries no address for the ticker.
    #[error("domain {domain} has no address record for currency {ticker}")]
    UnknownCurrency { domain: String, ticker: String },

    /// Domain is owned and resolvable but the requested record is unset.
    #[error("record {key} is not set for domain {domain} ({service})")]
    RecordNotFound {
        domain: String,
        key: String,
        service: NamingServiceType,
    },

    /// Domain is owned but no resolver contract is configured, so no record
    /// can exist.
    #[error("domain {domain} is owned but has no resolver configured ({service})")]
    UnspecifiedResolver {
        domain: String,
        service: NamingServiceType,
    },

    /// The blockchain endpoint could not be reached.
    #[error("blockchain endpoint for {service} is unreachable")]
    BlockchainIsDown {
        service: NamingServiceType,
        #[source]
        source: ProviderError,
    },

    /// The protocol lacks this capability (e.g. DNS records on ZNS).
    #[error("{method} is not supported by {service}")]
    NotImplemented {
        method: &'static str,
        service: NamingServiceType,
    },

    /// Anything that does not classify into the variants above.
    #[error("unexpected failure while resolving {domain} ({service})")]
    UnknownError {
        domain: String,
        service: NamingServiceType,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl ResolutionError {
    /// Classify a contract-layer failure into the taxonomy.
    ///
    /// Precedence mirrors the resolver boundary contract: an unreachable
    /// endpoint becomes [`ResolutionError::BlockchainIsDown`], a decode
    /// failure becomes [`ResolutionError::RecordNotFound`] (the queried slot
    /// did not hold what the catalog promised), and everything else becomes
    /// [`ResolutionError::UnknownError`] with the cause preserved.
    pub(crate) fn from_contract(
        err: ContractError,
        service: NamingServiceType,
        domain: &str,
        key: Option<&str>,
    ) -> Self {
        match err {
            ContractError::Provider(source @ ProviderError::Unreachable(_)) => {
                ResolutionError::BlockchainIsDown { service, source }
            }
            ContractError::Abi { .. } => ResolutionError::RecordNotFound {
                domain: domain.to_string(),
                key: key.unwrap_or("*").to_string(),
                service,
            },
            other => ResolutionError::UnknownError {
                domain: domain.to_string(),
                service,
                source: Some(Box::new(other)),
            },
        }
    }
}

/// Transport-level failure from the JSON-RPC provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The endpoint could not be reached at all (DNS, connect, timeout).
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    /// The HTTP exchange completed but failed (status, body decode).
    #[error("http error: {0}")]
    Http(String),

    /// The node returned a JSON-RPC error member.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response carried neither `result` nor `error`.
    #[error("missing result in rpc response")]
    MissingResult,
}

/// ABI codec failure.
#[derive(Debug, Error)]
pub enum AbiError {
    /// An argument did not match the catalog's parameter type.
    #[error("argument {index} does not match parameter type {expected}")]
    TypeMismatch { index: usize, expected: String },

    /// Return data ended before the decoder could read a full slot.
    #[error("return data truncated at offset {offset}, need {needed} bytes")]
    Truncated { offset: usize, needed: usize },

    /// A length or offset word exceeded the payload.
    #[error("malformed offset or length word in return data")]
    BadOffset,

    /// A decoded string was not valid UTF-8.
    #[error("invalid utf-8 in decoded string")]
    Utf8,

    /// Hex payload could not be decoded.
    #[error("invalid hex payload")]
    Hex(#[from] hex::FromHexError),
}

/// Failure while dispatching a contract method call.
#[derive(Debug, Error)]
pub enum ContractError {
    /// No catalog entry matches the method name and argument count.
    #[error("method {method} with {arity} argument(s) not found in catalog")]
    MethodNotFound { method: String, arity: usize },

    /// Registering a method would collide with an existing (name, arity) key.
    #[error("duplicate catalog entry for {method} with arity {arity}")]
    DuplicateMethod { method: String, arity: usize },

    /// Encode or decode failure.
    #[error("abi error calling {method}")]
    Abi {
        method: String,
        #[source]
        source: AbiError,
    },

    /// Transport failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The node's result was not the expected hex string, or the decoded
    /// tuple did not have the catalogued shape.
    #[error("malformed result for {method}: {reason}")]
    MalformedResult { method: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_transport_classifies_to_blockchain_is_down() {
        let err = ContractError::Provider(ProviderError::Unreachable("dns failure".into()));
        let classified =
            ResolutionError::from_contract(err, NamingServiceType::Uns, "brad.crypto", None);
        assert!(matches!(
            classified,
            ResolutionError::BlockchainIsDown {
                service: NamingServiceType::Uns,
                ..
            }
        ));
    }

    #[test]
    fn decode_failure_classifies_to_record_not_found() {
        let err = ContractError::Abi {
            method: "get".into(),
            source: AbiError::Utf8,
        };
        let classified = ResolutionError::from_contract(
            err,
            NamingServiceType::Cns,
            "brad.crypto",
            Some("crypto.ETH.address"),
        );
        assert!(matches!(
            classified,
            ResolutionError::RecordNotFound { ref key, .. } if key == "crypto.ETH.address"
        ));
    }

    #[test]
    fn rpc_error_classifies_to_unknown() {
        let err = ContractError::Provider(ProviderError::Rpc {
            code: -32000,
            message: "execution reverted".into(),
        });
        let classified =
            ResolutionError::from_contract(err, NamingServiceType::Uns, "brad.crypto", None);
        assert!(matches!(classified, ResolutionError::UnknownError { .. }));
    }
}
