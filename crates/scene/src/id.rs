//! Object id generation
//!
//! The editor never creates ids itself. It asks an injected [`IdGenerator`],
//! which in production is a [`SaltedCounter`] and in tests is usually a
//! [`SequentialIds`] or a closure.

use crate::types::ObjectId;

/// Source of unique object ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> ObjectId;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> ObjectId,
{
    fn next_id(&mut self) -> ObjectId {
        self()
    }
}

/// Monotonic counter mixed with a per-process random salt.
///
/// The low 20 bits carry the counter and the high 12 bits the salt, so ids
/// from two sessions are unlikely to collide while ids within a session are
/// strictly increasing. Once the counter space is exhausted the salt is
/// bumped, which keeps ids unique for far more objects than the editor will
/// ever hold.
#[derive(Debug, Clone)]
pub struct SaltedCounter {
    salt: u32,
    counter: u32,
}

const COUNTER_BITS: u32 = 20;
const COUNTER_MASK: u32 = (1 << COUNTER_BITS) - 1;
const SALT_MASK: u32 = (1 << (32 - COUNTER_BITS)) - 1;

impl SaltedCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_salt(fastrand::u32(..))
    }

    #[must_use]
    pub fn with_salt(salt: u32) -> Self {
        Self {
            salt: salt & SALT_MASK,
            counter: 0,
        }
    }
}

impl Default for SaltedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SaltedCounter {
    fn next_id(&mut self) -> ObjectId {
        self.counter += 1;
        if self.counter > COUNTER_MASK {
            self.counter = 1;
            self.salt = (self.salt + 1) & SALT_MASK;
            tracing::debug!(salt = self.salt, "id counter wrapped, advancing salt");
        }
        ObjectId((self.salt << COUNTER_BITS) | self.counter)
    }
}

/// Deterministic ids `start, start + 1, ...`.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
