//! In-process lease that keeps two rank runs for the same shop and collection
//! from interleaving their writes.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

type LeaseKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct RankLeases {
    held: Arc<Mutex<HashSet<LeaseKey>>>,
}

impl RankLeases {
    /// Takes the lease for `(shop_domain, collection_id)`, or returns `None`
    /// if a run for that pair is already in flight. The lease is released
    /// when the returned guard drops.
    pub fn try_acquire(&self, shop_domain: &str, collection_id: &str) -> Option<RankLease> {
        let key = (shop_domain.to_owned(), collection_id.to_owned());
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(key.clone()) {
            return None;
        }
        Some(RankLease {
            held: Arc::clone(&self.held),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_held(&self, shop_domain: &str, collection_id: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(shop_domain.to_owned(), collection_id.to_owned()))
    }
}

#[derive(Debug)]
pub struct RankLease {
    held: Arc<Mutex<HashSet<LeaseKey>>>,
    key: LeaseKey,
}

impl Drop for RankLease {
    fn drop(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_for_same_pair_is_refused() {
        let leases = RankLeases::default();
        let first = leases.try_acquire("a.myshopify.com", "gid://shopify/Collection/1");
        assert!(first.is_some());
        assert!(leases
            .try_acquire("a.myshopify.com", "gid://shopify/Collection/1")
            .is_none());
    }

    #[test]
    fn different_collection_or_shop_is_independent() {
        let leases = RankLeases::default();
        let _a = leases.try_acquire("a.myshopify.com", "gid://shopify/Collection/1");
        assert!(leases
            .try_acquire("a.myshopify.com", "gid://shopify/Collection/2")
            .is_some());
        assert!(leases
            .try_acquire("b.myshopify.com", "gid://shopify/Collection/1")
            .is_some());
    }

    #[test]
    fn dropping_the_lease_releases_it() {
        let leases = RankLeases::default();
        let lease = leases.try_acquire("a.myshopify.com", "gid://shopify/Collection/1");
        assert!(leases.is_held("a.myshopify.com", "gid://shopify/Collection/1"));
        drop(lease);
        assert!(!leases.is_held("a.myshopify.com", "gid://shopify/Collection/1"));
        assert!(leases
            .try_acquire("a.myshopify.com", "gid://shopify/Collection/1")
            .is_some());
    }
}
