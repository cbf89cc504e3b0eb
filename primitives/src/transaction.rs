//! Transactions and the context envelope exchanged between contracts.
//!
//! A contract calling another contract does not execute it; it builds a
//! sub-transaction that inherits the envelope of the spawning transaction.
//! Signing is left to the consensus layer, so sub-transactions carry an
//! empty signature.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::Hash;

/// A contract invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub cursor_num: u64,
    pub cursor_label: u32,
    pub lifetime: u64,
    pub sender: String,
    pub contract: String,
    pub method: String,
    /// Encoded method parameters; opaque to the bridge.
    #[serde(default)]
    pub param: Bytes,
    pub sig_alg: u32,
    #[serde(default)]
    pub signature: Bytes,
}

impl Transaction {
    /// Build a sub-transaction issued by this transaction's contract.
    pub fn sub_call(&self, contract: impl Into<String>, method: impl Into<String>, param: Bytes) -> Self {
        Self {
            version: self.version,
            cursor_num: self.cursor_num,
            cursor_label: self.cursor_label,
            lifetime: self.lifetime,
            sender: self.contract.clone(),
            contract: contract.into(),
            method: method.into(),
            param,
            sig_alg: self.sig_alg,
            signature: Bytes::new(),
        }
    }

    /// Deterministic binary encoding.
    ///
    /// Fixed-width fields are little-endian; variable fields are prefixed
    /// with their u32 LE length.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.param.len() + self.signature.len());
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.cursor_num.to_le_bytes());
        buf.extend_from_slice(&self.cursor_label.to_le_bytes());
        buf.extend_from_slice(&self.lifetime.to_le_bytes());
        write_var_bytes(&mut buf, self.sender.as_bytes());
        write_var_bytes(&mut buf, self.contract.as_bytes());
        write_var_bytes(&mut buf, self.method.as_bytes());
        write_var_bytes(&mut buf, &self.param);
        buf.extend_from_slice(&self.sig_alg.to_le_bytes());
        write_var_bytes(&mut buf, &self.signature);
        buf
    }

    /// BLAKE3 digest of [`encode`](Self::encode).
    pub fn digest(&self) -> Hash {
        *blake3::hash(&self.encode()).as_bytes()
    }
}

fn write_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buf.extend_from_slice(data);
}

/// Serialized call context handed between contract instances.
///
/// Only the transaction travels; the receiving side supplies its own role
/// provider and store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEnvelope {
    pub trx: Transaction,
}

impl ContextEnvelope {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            version: 1,
            cursor_num: 42,
            cursor_label: 7,
            lifetime: 1_700_000_000,
            sender: "alice".into(),
            contract: "wallet".into(),
            method: "pay".into(),
            param: Bytes::from_static(b"\x01\x02"),
            sig_alg: 1,
            signature: Bytes::from_static(&[9; 4]),
        }
    }

    #[test]
    fn test_sub_call_inherits_envelope() {
        let parent = sample();
        let child = parent.sub_call("bank", "transfer", Bytes::from_static(b"xyz"));

        assert_eq!(child.version, parent.version);
        assert_eq!(child.cursor_num, parent.cursor_num);
        assert_eq!(child.cursor_label, parent.cursor_label);
        assert_eq!(child.lifetime, parent.lifetime);
        assert_eq!(child.sig_alg, parent.sig_alg);
        assert_eq!(child.sender, "wallet");
        assert_eq!(child.contract, "bank");
        assert_eq!(child.method, "transfer");
        assert_eq!(&child.param[..], b"xyz");
        assert!(child.signature.is_empty());
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(sample().digest(), sample().digest());
        let mut other = sample();
        other.method = "refund".into();
        assert_ne!(sample().digest(), other.digest());
    }

    #[test]
    fn test_encode_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc".
        let mut a = sample();
        a.sender = "ab".into();
        a.contract = "c".into();
        let mut b = sample();
        b.sender = "a".into();
        b.contract = "bc".into();
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn test_envelope_json_roundtrip() {
        let env = ContextEnvelope { trx: sample() };
        let json = env.to_json().unwrap();
        assert_eq!(ContextEnvelope::from_json(&json).unwrap(), env);
    }

    #[test]
    fn test_envelope_defaults_missing_bytes() {
        let json = br#"{"trx":{"version":1,"cursor_num":0,"cursor_label":0,"lifetime":0,
            "sender":"a","contract":"b","method":"m","sig_alg":0}}"#;
        let env = ContextEnvelope::from_json(json).unwrap();
        assert!(env.trx.param.is_empty());
        assert_eq!(env.trx.contract, "b");
    }

    #[test]
    fn test_envelope_rejects_garbage() {
        assert!(ContextEnvelope::from_json(b"not json").is_err());
        assert!(ContextEnvelope::from_json(br#"{"trx":{}}"#).is_err());
    }
}
