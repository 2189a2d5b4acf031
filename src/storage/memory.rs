//! In-memory collaborators.
//!
//! [`InMemoryHeaderStore`] and [`InMemoryState`] back the tests and the demo
//! binary. Production nodes plug their own storage into the same traits.

use super::traits::{ChainHeaderReader, StateCommitter, StateError};
use crate::primitives::Header;
use alloy_primitives::{keccak256, Bytes, B256};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// In-memory header storage.
///
/// Headers are indexed by number and by hash. The head is the highest number
/// inserted so far.
///
/// # Example
///
/// ```ignore
/// use pova_consensus::storage::{ChainHeaderReader, InMemoryHeaderStore};
///
/// let store = InMemoryHeaderStore::with_headers([genesis.clone()]);
/// assert!(store.get_header(genesis.hash(), 0).is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryHeaderStore {
    /// Both indexes behind one lock so lookups never see a half-applied insert.
    inner: RwLock<HeaderIndex>,
}

#[derive(Debug, Default)]
struct HeaderIndex {
    /// Headers indexed by number.
    by_number: BTreeMap<u64, Header>,
    /// Hash to number mapping.
    hash_to_number: HashMap<B256, u64>,
}

impl InMemoryHeaderStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given headers.
    pub fn with_headers(headers: impl IntoIterator<Item = Header>) -> Self {
        let store = Self::new();
        for header in headers {
            store.insert(header);
        }
        store
    }

    /// Insert a header, replacing any header at the same number.
    ///
    /// Returns the header hash.
    pub fn insert(&self, header: Header) -> B256 {
        let hash = header.hash();
        let number = header.number;

        let mut inner = self.inner.write();
        if let Some(replaced) = inner.by_number.insert(number, header) {
            inner.hash_to_number.remove(&replaced.hash());
        }
        inner.hash_to_number.insert(hash, number);
        hash
    }

    /// Get the number of stored headers.
    pub fn len(&self) -> usize {
        self.inner.read().by_number.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_number.is_empty()
    }
}

impl ChainHeaderReader for InMemoryHeaderStore {
    fn get_header(&self, hash: B256, number: u64) -> Option<Header> {
        let inner = self.inner.read();
        if *inner.hash_to_number.get(&hash)? != number {
            return None;
        }
        inner.by_number.get(&number).cloned()
    }

    fn get_header_by_number(&self, number: u64) -> Option<Header> {
        self.inner.read().by_number.get(&number).cloned()
    }

    fn current_header(&self) -> Option<Header> {
        self.inner.read().by_number.values().next_back().cloned()
    }
}

/// In-memory key/value state with an explicit commit step.
///
/// Writes are staged until [`commit`](StateCommitter::commit). The root is the
/// keccak256 of the committed entries in key order, chained onto the previous
/// root so that identical contents at different heights hash differently.
#[derive(Debug, Default)]
pub struct InMemoryState {
    /// Committed entries.
    committed: BTreeMap<B256, Bytes>,
    /// Staged writes.
    pending: BTreeMap<B256, Bytes>,
    /// Root after the last commit.
    root: B256,
    /// Heights committed, in order.
    commits: Vec<u64>,
}

impl InMemoryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write.
    pub fn set(&mut self, key: B256, value: Bytes) {
        self.pending.insert(key, value);
    }

    /// Read a committed value.
    pub fn get(&self, key: &B256) -> Option<&Bytes> {
        self.committed.get(key)
    }

    /// Heights committed so far.
    pub fn commits(&self) -> &[u64] {
        &self.commits
    }

    /// Number of staged writes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn compute_root(&self) -> B256 {
        let mut data = Vec::with_capacity(32 + self.committed.len() * 64);
        data.extend_from_slice(self.root.as_slice());
        for (key, value) in &self.committed {
            data.extend_from_slice(key.as_slice());
            data.extend_from_slice(keccak256(value).as_slice());
        }
        keccak256(&data)
    }
}

impl StateCommitter for InMemoryState {
    fn commit(&mut self, number: u64) -> Result<(), StateError> {
        if let Some(&last) = self.commits.last() {
            if number <= last {
                return Err(StateError::NonSequentialCommit {
                    last,
                    requested: number,
                });
            }
        }

        let pending = std::mem::take(&mut self.pending);
        self.committed.extend(pending);
        self.root = self.compute_root();
        self.commits.push(number);
        Ok(())
    }

    fn intermediate_root(&self) -> B256 {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread,
    };

    fn header(number: u64, parent_hash: B256) -> Header {
        Header::new(number, parent_hash)
            .with_coinbase(Address::repeat_byte(number as u8))
    }

    #[test]
    fn test_header_store_lookup() {
        let store = InMemoryHeaderStore::new();
        let genesis = header(0, B256::ZERO);
        let genesis_hash = store.insert(genesis.clone());
        let child = header(1, genesis_hash);
        let child_hash = store.insert(child.clone());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_header(genesis_hash, 0), Some(genesis));
        assert_eq!(store.get_header(child_hash, 1), Some(child.clone()));
        assert_eq!(store.current_header(), Some(child));

        // Hash known but number wrong
        assert!(store.get_header(genesis_hash, 1).is_none());
        // Unknown hash
        assert!(store.get_header(B256::repeat_byte(0xff), 0).is_none());
    }

    #[test]
    fn test_header_store_with_headers() {
        let genesis = header(0, B256::ZERO);
        let child = header(1, genesis.hash());
        let store = InMemoryHeaderStore::with_headers([genesis.clone(), child.clone()]);

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.get_header_by_number(0), Some(genesis));
        assert_eq!(store.current_header(), Some(child));
    }

    #[test]
    fn test_header_store_replace() {
        let store = InMemoryHeaderStore::new();
        let first = store.insert(header(1, B256::ZERO));
        let second = store.insert(header(1, B256::repeat_byte(0x01)));

        assert_eq!(store.len(), 1);
        assert!(store.get_header(first, 1).is_none());
        assert!(store.get_header(second, 1).is_some());
    }

    #[test]
    fn test_header_store_lookup_during_replacement() {
        let store = Arc::new(InMemoryHeaderStore::new());
        let a = header(1, B256::ZERO);
        let b = header(1, B256::repeat_byte(0x01));
        let a_hash = a.hash();
        store.insert(a.clone());

        let done = Arc::new(AtomicBool::new(false));
        let writer = {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    store.insert(a.clone());
                    store.insert(b.clone());
                }
            })
        };

        let mut mismatched = 0;
        for _ in 0..50_000 {
            if let Some(found) = store.get_header(a_hash, 1) {
                if found.hash() != a_hash {
                    mismatched += 1;
                }
            }
        }
        done.store(true, Ordering::Relaxed);
        writer.join().unwrap();

        assert_eq!(mismatched, 0);
    }

    #[test]
    fn test_state_commit_updates_root() {
        let mut state = InMemoryState::new();
        let empty_root = state.intermediate_root();

        state.set(B256::repeat_byte(0x01), Bytes::from_static(b"one"));
        // Staged writes do not move the root
        assert_eq!(state.intermediate_root(), empty_root);
        assert!(state.get(&B256::repeat_byte(0x01)).is_none());

        state.commit(1).unwrap();
        let root1 = state.intermediate_root();
        assert_ne!(root1, empty_root);
        assert_eq!(state.pending_len(), 0);
        assert_eq!(
            state.get(&B256::repeat_byte(0x01)),
            Some(&Bytes::from_static(b"one"))
        );

        // Empty commit still chains the root
        state.commit(2).unwrap();
        assert_ne!(state.intermediate_root(), root1);
        assert_eq!(state.commits(), &[1, 2]);
    }

    #[test]
    fn test_state_rejects_non_sequential_commit() {
        let mut state = InMemoryState::new();
        state.commit(5).unwrap();

        let result = state.commit(5);
        assert_eq!(
            result,
            Err(StateError::NonSequentialCommit {
                last: 5,
                requested: 5,
            })
        );
    }
}
