//! Block assembly from a finalized header and body parts.

use crate::primitives::{ordered_root, Block, Header, Receipt};
use alloy_primitives::Bytes;

/// Builds a [`Block`] once the state root is in the header.
pub trait BlockAssembler: Send + Sync {
    /// Assemble a block, filling any body commitments in `header`.
    fn assemble(
        &self,
        header: Header,
        transactions: Vec<Bytes>,
        ommers: Vec<Header>,
        receipts: Vec<Receipt>,
    ) -> Block;
}

/// Commits to transactions and receipts with keccak256 of their RLP list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBlockAssembler;

impl BlockAssembler for DefaultBlockAssembler {
    fn assemble(
        &self,
        mut header: Header,
        transactions: Vec<Bytes>,
        ommers: Vec<Header>,
        receipts: Vec<Receipt>,
    ) -> Block {
        header.transactions_root = ordered_root(&transactions);
        header.receipts_root = ordered_root(&receipts);
        Block {
            header,
            transactions,
            ommers,
            receipts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn test_roots_follow_body() {
        let header = Header::new(1, B256::ZERO);
        let empty = DefaultBlockAssembler.assemble(header.clone(), vec![], vec![], vec![]);

        let txs = vec![Bytes::from_static(b"tx-1"), Bytes::from_static(b"tx-2")];
        let receipts = vec![
            Receipt {
                success: true,
                cumulative_gas_used: 21_000,
            },
            Receipt {
                success: false,
                cumulative_gas_used: 42_000,
            },
        ];
        let full = DefaultBlockAssembler.assemble(header, txs.clone(), vec![], receipts.clone());

        assert_ne!(
            empty.header.transactions_root,
            full.header.transactions_root
        );
        assert_ne!(empty.header.receipts_root, full.header.receipts_root);
        assert_eq!(full.header.transactions_root, ordered_root(&txs));
        assert_eq!(full.header.receipts_root, ordered_root(&receipts));
        assert_eq!(full.transactions, txs);
        assert_eq!(full.receipts, receipts);
    }

    #[test]
    fn test_transaction_order_matters() {
        let a = Bytes::from_static(b"a");
        let b = Bytes::from_static(b"b");
        let header = Header::new(1, B256::ZERO);

        let ab = DefaultBlockAssembler.assemble(
            header.clone(),
            vec![a.clone(), b.clone()],
            vec![],
            vec![],
        );
        let ba = DefaultBlockAssembler.assemble(header, vec![b, a], vec![], vec![]);
        assert_ne!(ab.header.transactions_root, ba.header.transactions_root);
    }
}
