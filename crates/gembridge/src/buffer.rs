//! In-memory content buffer backing synthetic file handles
//!
//! Uploads intercepted by the shim land here instead of the Files API. The
//! generation rewriter reads entries back by handle when it inlines the
//! bytes into an outbound request.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

/// Prefix marking a handle as shim-issued rather than a real file URI
const HANDLE_PREFIX: &str = "gembridge://";

/// Handle-to-bytes store shared between the upload and generation paths.
///
/// There is no eviction: an entry lives as long as the buffer (which the
/// client owns), so every handle handed to a caller stays dereferenceable.
/// This is a deliberate simplification - the expected call pattern is a
/// synchronous upload-then-generate with no long-lived handle reuse.
#[derive(Debug, Default)]
pub struct ContentBuffer {
    entries: DashMap<String, Bytes>,
}

impl ContentBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload and return its synthetic handle.
    ///
    /// The handle is derived from a hash of the payload content, so storing
    /// identical bytes twice yields the same handle and `put` is idempotent.
    /// Entries are never mutated after insertion.
    pub fn put(&self, payload: impl Into<Bytes>) -> String {
        let payload = payload.into();
        let handle = derive_handle(&payload);
        self.entries.insert(handle.clone(), payload);
        handle
    }

    /// Look up a payload by handle
    pub fn get(&self, handle: &str) -> Option<Bytes> {
        self.entries.get(handle).map(|entry| entry.value().clone())
    }

    /// Check whether a handle is present
    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    /// Number of buffered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive a deterministic handle from payload content
fn derive_handle(payload: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    hasher.write(payload);
    format!("{}{:016x}-{}", HANDLE_PREFIX, hasher.finish(), payload.len())
}
