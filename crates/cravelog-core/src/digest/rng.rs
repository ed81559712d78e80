//! Seeded linear-congruential generator for digest content selection.

/// Deterministic 64-bit LCG.
///
/// `state = state * MULTIPLIER + INCREMENT (mod 2^64)`; every call returns
/// the new state. The same seed always yields the same sequence. Not for
/// anything security related.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededGenerator {
    state: u64,
}

impl SeededGenerator {
    pub const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    pub const INCREMENT: u64 = 1_442_695_040_888_963_407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Index in `[0, len)`, taken from the high bits of the next output.
    /// The low bits of a power-of-two LCG repeat with a short period.
    pub fn choose_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_u64() >> 33) % len as u64) as usize
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.choose_index(items.len());
        items.get(index)
    }
}

impl Iterator for SeededGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}
