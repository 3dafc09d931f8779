//! Prompt fingerprints and record id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits the birthday bound sits around 4.3 billion items, so for cache
/// sizes this crate targets (hundreds to low thousands of records) collisions are
/// negligible. Record ids additionally mix in a timestamp and a sequence number
/// (see [`RecordIdGenerator`]), so two records never share an id just because
/// their prompts share a fingerprint.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Content fingerprint of a prompt (exact text, no normalization).
#[inline]
pub fn prompt_fingerprint(prompt: &str) -> u64 {
    hash_to_u64(prompt.as_bytes())
}

// Separates generators created in the same process and clock tick.
static GENERATOR_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates collision-resistant record ids.
///
/// Ids have the shape `{fingerprint:016x}-{timestamp_ms:x}-{instance:08x}-{seq:x}`:
/// the prompt fingerprint, the creation time, a per-generator instance tag and a
/// monotonically increasing sequence number. The sequence alone guarantees
/// uniqueness within one generator; the instance tag separates generators in
/// different processes writing to the same store. Ids contain only
/// `[0-9a-f-]`, so they are safe as file names.
#[derive(Debug)]
pub struct RecordIdGenerator {
    instance: u32,
    sequence: AtomicU64,
}

impl Default for RecordIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&std::process::id().to_le_bytes());
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();
        hasher.update(&nanos.to_le_bytes());
        hasher.update(&GENERATOR_SEQUENCE.fetch_add(1, Ordering::Relaxed).to_le_bytes());

        let hash = hasher.finalize();
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&hash.as_bytes()[0..4]);

        Self::with_instance(u32::from_le_bytes(bytes))
    }

    /// Creates a generator with a fixed instance tag (reproducible ids in tests).
    pub fn with_instance(instance: u32) -> Self {
        Self {
            instance,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Returns a fresh id for a record created at `timestamp_ms` from `prompt`.
    pub fn next_id(&self, prompt: &str, timestamp_ms: i64) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{:016x}-{:x}-{:08x}-{:x}",
            prompt_fingerprint(prompt),
            timestamp_ms.max(0),
            self.instance,
            seq
        )
    }
}
