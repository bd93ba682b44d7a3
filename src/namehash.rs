//! Namehash algorithms.
//!
//! A namehash turns a dotted domain string into the fixed-size identifier
//! that keys the domain's contract state. Two algorithms exist, one per
//! protocol family: the Ethereum-style keccak256 fold used by UNS and CNS,
//! and the Zilliqa-style sha256 fold used by ZNS. Both are pure and
//! deterministic; callers normalize case before hashing.

use sha2::Sha256;
use sha3::{Digest, Keccak256};

/// 256-bit token identifier derived from a domain name.
///
/// Acts as the primary key for a domain's on-chain state and is stable for
/// the domain's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    /// Render as a `0x`-prefixed 64-digit hex string.
    pub fn to_hex(self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Ethereum-style namehash: fold labels right to left with
/// `node = keccak256(node ++ keccak256(label))`, starting from a 32-byte
/// zero root for the implicit top label.
pub fn eth_namehash(domain: &str) -> TokenId {
    let mut node = [0u8; 32];
    for label in domain.split('.').rev() {
        let mut hasher = Keccak256::new();
        hasher.update(label.as_bytes());
        let label_hash = hasher.finalize();

        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node.copy_from_slice(&hasher.finalize());
    }
    TokenId(node)
}

/// Zilliqa-style namehash: the same right-to-left fold with sha256, seeded by
/// a 32-byte zero parent.
pub fn zil_namehash(domain: &str) -> TokenId {
    let mut node = [0u8; 32];
    for label in domain.split('.').rev() {
        let mut hasher = Sha256::new();
        hasher.update(label.as_bytes());
        let label_hash = hasher.finalize();

        let mut hasher = Sha256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node.copy_from_slice(&hasher.finalize());
    }
    TokenId(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eth_namehash_known_vectors() {
        assert_eq!(
            eth_namehash("brad.crypto").to_hex(),
            "0x756e4e998dbffd803c21d23b06cd855cdc7a4b57706c95964a37e24b47c10fc9"
        );
        assert_eq!(
            eth_namehash("crypto").to_hex(),
            "0x0f4a10a4f46c288cea365fcf45cccf0e9d901b945b9829ccdb54c10dc3cb7a6f"
        );
        assert_eq!(
            eth_namehash("beresnev.crypto").to_hex(),
            "0x29bf1b111e709f0953848df35e419490fbad5d316690e4de61adc52695ddf9f3"
        );
    }

    #[test]
    fn zil_namehash_known_vector() {
        assert_eq!(
            zil_namehash("brad.zil").to_hex(),
            "0x5fc604da00f502da70bfbc618088c0ce468ec9d18d05540935ae4118e8f50787"
        );
    }

    #[test]
    fn namehash_is_deterministic() {
        assert_eq!(eth_namehash("alice.crypto"), eth_namehash("alice.crypto"));
        assert_eq!(zil_namehash("alice.zil"), zil_namehash("alice.zil"));
    }

    #[test]
    fn protocol_families_diverge_on_the_same_input() {
        assert_ne!(eth_namehash("alice.zil"), zil_namehash("alice.zil"));
    }

    #[test]
    fn namehash_is_case_sensitive_as_given() {
        assert_ne!(eth_namehash("Alice.crypto"), eth_namehash("alice.crypto"));
    }
}
