//! Execution header, receipt and block types used by the POVA engine.
//!
//! # Header Structure
//!
//! ```text
//! Header
//! ├── parent_hash: B256
//! ├── coinbase: Address        (declared producer)
//! ├── state_root: B256         (filled by finalize_and_assemble)
//! ├── transactions_root: B256
//! ├── receipts_root: B256
//! ├── difficulty: u64          (always 1 on a POVA chain)
//! ├── number: u64
//! ├── time: u64
//! └── extra: Bytes             (vanity, optional 65 byte seal suffix)
//! ```

use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_rlp::{Encodable, RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Block header.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Hash of the parent header.
    pub parent_hash: B256,
    /// Address of the validator that claims to have produced this block.
    pub coinbase: Address,
    /// State root after executing the block.
    pub state_root: B256,
    /// Root of the transaction list.
    pub transactions_root: B256,
    /// Root of the receipt list.
    pub receipts_root: B256,
    /// Difficulty marker.
    pub difficulty: u64,
    /// Block height.
    pub number: u64,
    /// Unix timestamp in seconds.
    pub time: u64,
    /// Extra data.
    pub extra: Bytes,
}

impl Header {
    /// Create a header at the given height on top of `parent_hash`.
    pub fn new(number: u64, parent_hash: B256) -> Self {
        Self {
            number,
            parent_hash,
            ..Default::default()
        }
    }

    /// Set the declared producer.
    pub fn with_coinbase(mut self, coinbase: Address) -> Self {
        self.coinbase = coinbase;
        self
    }

    /// Set the timestamp.
    pub fn with_time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    /// Set the extra data.
    pub fn with_extra(mut self, extra: Bytes) -> Self {
        self.extra = extra;
        self
    }

    /// Keccak256 of the RLP encoding.
    pub fn hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(self.length());
        self.encode(&mut buf);
        keccak256(&buf)
    }

    /// Whether this is the genesis header.
    pub const fn is_genesis(&self) -> bool {
        self.number == 0
    }
}

/// Transaction receipt, reduced to the fields the block assembler commits to.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Gas used by the block up to and including this transaction.
    pub cumulative_gas_used: u64,
}

/// A candidate or finished block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header.
    pub header: Header,
    /// Encoded transactions.
    pub transactions: Vec<Bytes>,
    /// Ancestor headers included with the block. Always empty on POVA chains.
    pub ommers: Vec<Header>,
    /// Receipts, one per transaction.
    pub receipts: Vec<Receipt>,
}

impl Block {
    /// Create a block with an empty body.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    /// Block height.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Parent hash.
    pub fn parent_hash(&self) -> B256 {
        self.header.parent_hash
    }

    /// Declared producer.
    pub fn coinbase(&self) -> Address {
        self.header.coinbase
    }

    /// Header hash.
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }
}

/// Keccak256 of the RLP list encoding of `items`.
pub fn ordered_root<T: Encodable>(items: &[T]) -> B256 {
    let mut buf = Vec::new();
    alloy_rlp::encode_list::<T, T>(items, &mut buf);
    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rlp::Decodable;

    #[test]
    fn test_hash_changes_with_coinbase() {
        let a = Header::new(1, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x01));
        let b = Header::new(1, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x02));

        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash(), a.clone().hash());
    }

    #[test]
    fn test_rlp_decodes_what_it_encodes() {
        let header = Header::new(7, B256::repeat_byte(0xaa))
            .with_coinbase(Address::repeat_byte(0x03))
            .with_time(1_700_000_000)
            .with_extra(Bytes::from_static(b"pova"));

        let encoded = alloy_rlp::encode(&header);
        let decoded = Header::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_ordered_root_depends_on_order() {
        let a = vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")];
        let b = vec![Bytes::from_static(b"b"), Bytes::from_static(b"a")];
        assert_ne!(ordered_root(&a), ordered_root(&b));
    }

    #[test]
    fn test_block_accessors() {
        let header = Header::new(3, B256::repeat_byte(0x11))
            .with_coinbase(Address::repeat_byte(0x05));
        let block = Block::new(header.clone());

        assert_eq!(block.number(), 3);
        assert_eq!(block.parent_hash(), B256::repeat_byte(0x11));
        assert_eq!(block.coinbase(), Address::repeat_byte(0x05));
        assert_eq!(block.hash(), header.hash());
    }
}
