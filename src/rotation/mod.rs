//! Round-robin session rotation.

use std::sync::{Mutex, MutexGuard};

/// Rotating cursor over the session pool.
///
/// The cursor lives behind its own mutex so handing out positions imposes a
/// total order without contending on configuration reads. Callers pass the
/// pool size they just observed; a concurrent pool swap can make a returned
/// position stale, so it must be re-validated against the pool before use.
#[derive(Debug, Default)]
pub struct SessionRotor {
    cursor: Mutex<usize>,
}

impl SessionRotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the current position and advance, wrapping at `pool_size`.
    ///
    /// An empty pool returns 0 without advancing; callers must treat that
    /// as "no session available" rather than a valid index.
    pub fn next(&self, pool_size: usize) -> usize {
        let mut cursor = self.lock();
        if pool_size == 0 {
            return 0;
        }
        let position = *cursor;
        *cursor = (position + 1) % pool_size;
        position
    }

    /// Rewind to position 0. Called whenever the pool is replaced.
    pub fn reset(&self) {
        *self.lock() = 0;
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.cursor.lock().expect("session rotor mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_rotor_visits_positions_in_ascending_order() {
        let rotor = SessionRotor::new();
        let positions: Vec<usize> = (0..7).map(|_| rotor.next(3)).collect();
        assert_eq!(positions, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_rotor_empty_pool_does_not_advance() {
        let rotor = SessionRotor::new();
        assert_eq!(rotor.next(0), 0);
        assert_eq!(rotor.next(0), 0);
        // first call against a real pool still starts at 0
        assert_eq!(rotor.next(2), 0);
        assert_eq!(rotor.next(2), 1);
    }

    #[test]
    fn test_rotor_reset_rewinds_to_zero() {
        let rotor = SessionRotor::new();
        rotor.next(3);
        rotor.next(3);
        rotor.reset();
        assert_eq!(rotor.next(3), 0);
    }

    #[test]
    fn test_rotor_single_entry_pool_stays_at_zero() {
        let rotor = SessionRotor::new();
        for _ in 0..4 {
            assert_eq!(rotor.next(1), 0);
        }
    }

    #[test]
    fn test_rotor_concurrent_calls_spread_evenly() {
        let rotor = Arc::new(SessionRotor::new());
        let pool_size = 10;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rotor = rotor.clone();
                thread::spawn(move || {
                    (0..25).map(|_| rotor.next(pool_size)).collect::<Vec<usize>>()
                })
            })
            .collect();

        let mut counts = vec![0usize; pool_size];
        for handle in handles {
            for position in handle.join().unwrap() {
                counts[position] += 1;
            }
        }

        // 100 calls over a stable pool of 10 land on each position exactly 10 times
        assert_eq!(counts, vec![10; pool_size]);
    }
}
