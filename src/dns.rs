//! DNS record assembly.
//!
//! Domains can carry DNS data in their records under `dns.<TYPE>`,
//! `dns.<TYPE>.ttl` and a shared `dns.ttl` key. A `dns.<TYPE>` value is a
//! JSON array of strings (a bare string is accepted as a single entry); each
//! entry becomes one [`DnsRecord`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// TTL applied when neither a per-type nor the shared `dns.ttl` key is set.
pub const DEFAULT_DNS_TTL: u32 = 300;

/// Supported DNS record types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsRecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
    #[serde(rename = "MX")]
    Mx,
    #[serde(rename = "TXT")]
    Txt,
}

impl DnsRecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::Aaaa => "AAAA",
            DnsRecordType::Cname => "CNAME",
            DnsRecordType::Mx => "MX",
            DnsRecordType::Txt => "TXT",
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assembled DNS record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_type: DnsRecordType,
    pub ttl: u32,
    pub value: String,
}

/// Record keys to request for a set of DNS types: the shared ttl key first,
/// then value and ttl keys per type, in request order.
pub fn record_keys(types: &[DnsRecordType]) -> Vec<String> {
    let mut keys = vec!["dns.ttl".to_string()];
    for ty in types {
        keys.push(format!("dns.{ty}"));
        keys.push(format!("dns.{ty}.ttl"));
    }
    keys
}

/// Assemble records from raw key/value data.
///
/// Per-type ttl wins over the shared `dns.ttl`, which wins over
/// [`DEFAULT_DNS_TTL`]. Types with no value key contribute nothing.
pub fn build_records(raw: &HashMap<String, String>, types: &[DnsRecordType]) -> Vec<DnsRecord> {
    let shared_ttl = raw
        .get("dns.ttl")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DNS_TTL);

    let mut records = Vec::new();
    for &ty in types {
        let Some(value) = raw.get(&format!("dns.{ty}")) else {
            continue;
        };
        let ttl = raw
            .get(&format!("dns.{ty}.ttl"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(shared_ttl);
        for entry in parse_values(value) {
            records.push(DnsRecord {
                record_type: ty,
                ttl,
                value: entry,
            });
        }
    }
    records
}

/// A `dns.<TYPE>` value is normally a JSON string array; tolerate a bare
/// string as a single-entry list.
fn parse_values(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(_) => vec![raw.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn requested_keys_cover_shared_and_per_type_ttl() {
        let keys = record_keys(&[DnsRecordType::A, DnsRecordType::Cname]);
        assert_eq!(
            keys,
            vec!["dns.ttl", "dns.A", "dns.A.ttl", "dns.CNAME", "dns.CNAME.ttl"]
        );
    }

    #[test]
    fn per_type_ttl_beats_shared_ttl() {
        let raw = raw(&[
            ("dns.ttl", "128"),
            ("dns.A", r#"["10.0.0.1","10.0.0.2"]"#),
            ("dns.A.ttl", "90"),
            ("dns.AAAA", r#"["::1"]"#),
        ]);
        let records = build_records(&raw, &[DnsRecordType::A, DnsRecordType::Aaaa]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ttl, 90);
        assert_eq!(records[0].value, "10.0.0.1");
        assert_eq!(records[1].ttl, 90);
        assert_eq!(records[2].record_type, DnsRecordType::Aaaa);
        assert_eq!(records[2].ttl, 128);
    }

    #[test]
    fn missing_ttl_keys_fall_back_to_default() {
        let raw = raw(&[("dns.A", r#"["10.0.0.1"]"#)]);
        let records = build_records(&raw, &[DnsRecordType::A]);
        assert_eq!(records[0].ttl, DEFAULT_DNS_TTL);
    }

    #[test]
    fn bare_string_value_is_a_single_record() {
        let raw = raw(&[("dns.CNAME", "example.com")]);
        let records = build_records(&raw, &[DnsRecordType::Cname]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "example.com");
    }

    #[test]
    fn types_without_values_contribute_nothing() {
        let raw = raw(&[("dns.ttl", "60")]);
        assert!(build_records(&raw, &[DnsRecordType::Txt]).is_empty());
    }
}
