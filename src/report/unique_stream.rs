// Unique-stream arbitration - keeps hosts that share a destination from
// writing the same output twice

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::stream::StreamId;

/// Process-unique identity of a reporter host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(u64);

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

impl HostId {
    pub fn next() -> Self {
        Self(NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Decides which host may physically write to a shared stream.
pub trait StreamController: Send + Sync {
    /// Returns `true` if `host` is the licensed writer for `stream`.
    fn ensure_unique_stream(&self, stream: StreamId, host: HostId) -> bool;
}

/// The first host to claim a stream keeps it until the stream is released.
#[derive(Debug, Default)]
pub struct FirstWriterController {
    owners: Mutex<HashMap<StreamId, HostId>>,
}

impl FirstWriterController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `stream` for `host` ahead of its first write. Returns the owner
    /// after the call, which is `host` unless another host got there first.
    pub fn register(&self, stream: StreamId, host: HostId) -> HostId {
        match self.owners.lock() {
            Ok(mut owners) => *owners.entry(stream).or_insert(host),
            Err(poisoned) => *poisoned.into_inner().entry(stream).or_insert(host),
        }
    }

    /// Drop the claim on `stream`; the next host to ask becomes its owner.
    pub fn release(&self, stream: StreamId) {
        match self.owners.lock() {
            Ok(mut owners) => {
                owners.remove(&stream);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(&stream);
            }
        }
    }

    pub fn owner(&self, stream: StreamId) -> Option<HostId> {
        match self.owners.lock() {
            Ok(owners) => owners.get(&stream).copied(),
            Err(poisoned) => poisoned.into_inner().get(&stream).copied(),
        }
    }
}

impl StreamController for FirstWriterController {
    fn ensure_unique_stream(&self, stream: StreamId, host: HostId) -> bool {
        let owner = self.register(stream, host);
        let licensed = owner == host;
        tracing::trace!(
            "stream {:?}: host {} {}",
            stream,
            host.as_u64(),
            if licensed { "licensed" } else { "denied" }
        );
        licensed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::stream::OutStream;

    #[test]
    fn test_first_claimant_wins() {
        let controller = FirstWriterController::new();
        let (stream, _) = OutStream::buffer();
        let a = HostId::next();
        let b = HostId::next();

        assert!(controller.ensure_unique_stream(stream.id(), a));
        assert!(!controller.ensure_unique_stream(stream.id(), b));
        assert!(controller.ensure_unique_stream(stream.id(), a));
        assert_eq!(controller.owner(stream.id()), Some(a));
    }

    #[test]
    fn test_streams_are_independent() {
        let controller = FirstWriterController::new();
        let (first, _) = OutStream::buffer();
        let (second, _) = OutStream::buffer();
        let a = HostId::next();
        let b = HostId::next();

        assert!(controller.ensure_unique_stream(first.id(), a));
        assert!(controller.ensure_unique_stream(second.id(), b));
    }

    #[test]
    fn test_release_hands_over() {
        let controller = FirstWriterController::new();
        let (stream, _) = OutStream::buffer();
        let a = HostId::next();
        let b = HostId::next();

        controller.register(stream.id(), a);
        controller.release(stream.id());
        assert!(controller.ensure_unique_stream(stream.id(), b));
    }

    #[test]
    fn test_host_ids_are_unique() {
        assert_ne!(HostId::next(), HostId::next());
    }
}
