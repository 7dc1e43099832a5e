use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Addresses of interest. Grows only; there is no unsubscribe.
///
/// Matching is exact: `0xAbC` and `0xabc` are different entries.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    addresses: Mutex<HashSet<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `address`, returning `true` only if it was not already present.
    ///
    /// The presence check and the insert happen under one lock, so concurrent
    /// first-time calls for the same address yield exactly one `true`.
    pub fn subscribe(&self, address: &str) -> bool {
        self.lock().insert(address.to_string())
    }

    pub fn is_subscribed(&self, address: &str) -> bool {
        self.lock().contains(address)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the subscribed addresses, sorted
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.lock().iter().cloned().collect();
        addresses.sort();
        addresses
    }

    // The set stays consistent even if a holder panicked: insert is the only mutation.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.addresses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
