//! Network identifiers and per-resolver configuration.

use serde::{Deserialize, Serialize};

/// Known chain identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Kovan,
    /// Zilliqa developer testnet.
    ZilTestnet,
}

impl Network {
    /// Numeric chain id.
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Ropsten => 3,
            Network::Rinkeby => 4,
            Network::Goerli => 5,
            Network::Kovan => 42,
            Network::ZilTestnet => 333,
        }
    }

    /// Symbolic network name.
    pub fn name(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Ropsten => "ropsten",
            Network::Rinkeby => "rinkeby",
            Network::Goerli => "goerli",
            Network::Kovan => "kovan",
            Network::ZilTestnet => "testnet",
        }
    }

    /// Look a network up by chain id. Unmatched ids yield no network.
    pub fn from_chain_id(chain_id: u64) -> Option<Network> {
        match chain_id {
            1 => Some(Network::Mainnet),
            3 => Some(Network::Ropsten),
            4 => Some(Network::Rinkeby),
            5 => Some(Network::Goerli),
            42 => Some(Network::Kovan),
            333 => Some(Network::ZilTestnet),
            _ => None,
        }
    }
}

/// Immutable configuration for one (protocol, network) resolver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NsConfig {
    /// Numeric chain id of the target network.
    pub chain_id: u64,
    /// JSON-RPC endpoint URL.
    pub provider_url: String,
    /// Address of the protocol's entry-point contract (proxy reader for
    /// UNS/CNS, registry for ZNS).
    pub contract_address: String,
}

impl NsConfig {
    pub fn new(
        chain_id: u64,
        provider_url: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            chain_id,
            provider_url: provider_url.into(),
            contract_address: contract_address.into(),
        }
    }

    /// The network this configuration targets, if the chain id is known.
    pub fn network(&self) -> Option<Network> {
        Network::from_chain_id(self.chain_id)
    }
}

/// Well-known mainnet contract addresses.
pub mod contract_addresses {
    /// UNS proxy reader.
    pub const UNS_PROXY_READER: &str = "0xfEe4D4F0aDFF8D84c12170306507554bC7045878";
    /// CNS-generation proxy reader.
    pub const CNS_PROXY_READER: &str = "0x7ea9Ee21077F84339eDa9C80048ec6db678642B1";
    /// UNS registry.
    pub const UNS_REGISTRY: &str = "0x049aba7510f45BA5b64ea9E658E342F904DB358D";
    /// CNS registry.
    pub const CNS_REGISTRY: &str = "0xD1E5b0FF1287aA9f9A268759062E4Ab08b9Dacbe";
    /// ZNS registry on the Zilliqa mainnet.
    pub const ZNS_REGISTRY: &str = "0x9611c53BE6d1b32058b2747bdeCECed7e1216793";
}
