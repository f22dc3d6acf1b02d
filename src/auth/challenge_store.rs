//! Outstanding challenge nonces, at most one per account.
//!
//! Backed by a sharded concurrent map so unrelated accounts never contend on
//! a single lock. Operations on the same account are only as ordered as the
//! map's per-key consistency: a challenge request racing a response for the
//! same account has no defined winner.

use dashmap::DashMap;
use uuid::Uuid;

use super::address::Address;

/// In-memory store of outstanding nonces. Nonces never expire.
#[derive(Debug, Default)]
pub struct ChallengeStore {
    nonces: DashMap<Address, Uuid>,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self {
            nonces: DashMap::new(),
        }
    }

    /// Set the outstanding nonce for an account, replacing any previous one
    pub fn put(&self, account: Address, nonce: Uuid) {
        self.nonces.insert(account, nonce);
    }

    /// Outstanding nonce for an account, if any
    pub fn get(&self, account: &Address) -> Option<Uuid> {
        self.nonces.get(account).map(|entry| *entry.value())
    }

    /// Drop the nonce for an account. No-op when absent.
    pub fn remove(&self, account: &Address) {
        self.nonces.remove(account);
    }

    pub fn len(&self) -> usize {
        self.nonces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn account(n: u8) -> Address {
        Address::from(format!("0x{:040x}", n))
    }

    #[test]
    fn test_put_overwrites() {
        let store = ChallengeStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store.put(account(1), first);
        store.put(account(1), second);

        assert_eq!(store.get(&account(1)), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_does_not_remove() {
        let store = ChallengeStore::new();
        let nonce = Uuid::new_v4();
        store.put(account(1), nonce);

        assert_eq!(store.get(&account(1)), Some(nonce));
        assert_eq!(store.get(&account(1)), Some(nonce));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = ChallengeStore::new();
        store.put(account(1), Uuid::new_v4());

        store.remove(&account(1));
        store.remove(&account(1));
        store.remove(&account(2));

        assert!(store.get(&account(1)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let store = ChallengeStore::new();
        let nonce = Uuid::new_v4();
        store.put(
            Address::from("0xAB5783935e2b9C8F3E3Ee0751a60693bb7451B76"),
            nonce,
        );

        assert_eq!(
            store.get(&Address::from("0xab5783935e2b9c8f3e3ee0751a60693bb7451b76")),
            Some(nonce)
        );
    }

    #[tokio::test]
    async fn test_concurrent_distinct_accounts() {
        let store = Arc::new(ChallengeStore::new());

        let mut handles = Vec::new();
        for n in 0..64u8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let nonce = Uuid::new_v4();
                store.put(account(n), nonce);
                (n, nonce)
            }));
        }

        for handle in handles {
            let (n, nonce) = handle.await.unwrap();
            assert_eq!(store.get(&account(n)), Some(nonce));
        }
        assert_eq!(store.len(), 64);
    }
}
