//! Order id generation.
//!
//! Order ids are `YYYYMMDD` (local date) + 14-digit nanosecond timestamp
//! (modulo 10^14, zero padded) + 4-digit random suffix, 26 digits in total.
//!
//! Within one process the nanosecond component is forced strictly
//! increasing, so two calls never share a timestamp. Across processes
//! uniqueness is probabilistic and rests on the random suffix; the gateway
//! rejects duplicate order ids, which surfaces as a business failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use entauth_core::Clock;
use rand_core::{OsRng, RngCore};

const TIMESTAMP_MODULUS: u64 = 100_000_000_000_000;
const SUFFIX_MODULUS: u32 = 10_000;

/// A generated order id and the date it embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderId {
    /// `YYYYMMDD`, sent as the `orderDate` field.
    pub order_date: String,
    /// The full 26-digit id.
    pub order_id: String,
}

#[derive(Debug)]
pub struct OrderIdGenerator {
    clock: Arc<dyn Clock>,
    last_nanos: AtomicU64,
}

impl OrderIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_nanos: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> OrderId {
        let now = self.clock.now();
        let wall_nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
        let nanos = self.claim_nanos(u64::try_from(wall_nanos).unwrap_or(0));

        let order_date = now.with_timezone(&Local).format("%Y%m%d").to_string();
        let suffix = OsRng.next_u32() % SUFFIX_MODULUS;
        let order_id = format!(
            "{order_date}{:014}{suffix:04}",
            nanos % TIMESTAMP_MODULUS
        );

        OrderId {
            order_date,
            order_id,
        }
    }

    /// Reserve a nanosecond value strictly greater than every value handed
    /// out before.
    fn claim_nanos(&self, wall_nanos: u64) -> u64 {
        let mut current = self.last_nanos.load(Ordering::Relaxed);
        loop {
            let candidate = wall_nanos.max(current.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }
}
