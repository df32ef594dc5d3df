//! Parity, primality and chunk-local frequency of integers.

use super::{ChunkResult, Kernel};
use crate::core::types::{Aggregate, KernelKind, Value};
use crate::partition::Chunk;
use crate::report::NumericReport;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Index of the parity total in the reduced aggregates.
pub const PARITY: usize = 0;
/// Index of the prime total in the reduced aggregates.
pub const PRIME: usize = 1;

const AGGREGATES: &[&str] = &["parity", "prime"];

/// Classification of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The element
    pub value: Value,
    /// `Some(value)` if the element is prime
    pub prime: Option<Value>,
    /// Occurrences of `value` in the chunk if this is the first one, 0 otherwise
    pub frequency: u32,
    /// True if the element is even
    pub even: bool,
}

/// Trial-division primality test.
///
/// Values below 2 are not prime; otherwise any divisor in `2..=value / 2`
/// rules the value out.
pub fn is_prime(value: Value) -> bool {
    value >= 2 && (2..=value / 2).all(|n| value % n != 0)
}

/// Chunk-local frequencies: the first occurrence of each value carries the
/// number of times it occurs in `values`, later duplicates carry 0.
pub fn chunk_frequencies(values: &[Value]) -> Vec<u32> {
    let mut frequencies: Vec<Option<u32>> = vec![None; values.len()];
    for i in 0..values.len() {
        let mut count = 1;
        for j in i + 1..values.len() {
            if values[i] == values[j] {
                count += 1;
                frequencies[j] = Some(0);
            }
        }
        if frequencies[i] != Some(0) {
            frequencies[i] = Some(count);
        }
    }
    frequencies.into_iter().map(|f| f.unwrap_or(0)).collect()
}

/// Numeric variant over integers drawn from `[value_min, value_max]`.
#[derive(Debug, Clone, Copy)]
pub struct NumericKernel {
    value_min: Value,
    value_max: Value,
}

impl NumericKernel {
    /// Create the kernel. The bounds are swapped if given in reverse.
    pub fn new(value_min: Value, value_max: Value) -> Self {
        NumericKernel {
            value_min: value_min.min(value_max),
            value_max: value_max.max(value_min),
        }
    }

    /// Inclusive value range of synthesized datasets.
    pub fn value_range(&self) -> (Value, Value) {
        (self.value_min, self.value_max)
    }
}

impl Default for NumericKernel {
    fn default() -> Self {
        use crate::core::constants::{DEFAULT_VALUE_MAX, DEFAULT_VALUE_MIN};
        NumericKernel::new(DEFAULT_VALUE_MIN, DEFAULT_VALUE_MAX)
    }
}

impl Kernel for NumericKernel {
    type Input = Value;
    type Output = Classification;
    type Report = NumericReport;

    fn kind(&self) -> KernelKind {
        KernelKind::Numeric
    }

    fn aggregate_names(&self) -> &'static [&'static str] {
        AGGREGATES
    }

    fn synthesize(&self, size: usize, seed: u64) -> Vec<Value> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size)
            .map(|_| rng.gen_range(self.value_min..=self.value_max))
            .collect()
    }

    fn compute(&self, chunk: Chunk, inputs: &[Value]) -> ChunkResult<Classification> {
        log::debug!("numeric kernel over {:?}", chunk.range());
        let frequencies = chunk_frequencies(inputs);

        let mut parity: Aggregate = 0;
        let mut primes: Aggregate = 0;
        let outputs = inputs
            .iter()
            .zip(frequencies)
            .map(|(&value, frequency)| {
                let even = value % 2 == 0;
                let prime = is_prime(value).then_some(value);
                parity += Aggregate::from(even);
                primes += Aggregate::from(prime.is_some());
                Classification {
                    value,
                    prime,
                    frequency,
                    even,
                }
            })
            .collect();

        ChunkResult {
            outputs,
            aggregates: vec![parity, primes],
        }
    }

    fn report(&self, outputs: &[Classification], totals: &[Aggregate]) -> NumericReport {
        let total = |index: usize| totals.get(index).copied().unwrap_or_default();
        NumericReport::new(outputs, total(PARITY), total(PRIME))
    }
}
