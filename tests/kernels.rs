//! Kernel behaviour through the public API.

use approx::assert_relative_eq;
use partition_batch::kernel::numeric::{chunk_frequencies, PARITY, PRIME};
use partition_batch::kernel::{is_prime, InscribedTriangle};
use partition_batch::*;
use proptest::prelude::*;

mod common;
use common::*;

#[test]
fn test_prime_boundaries() {
    let expected = [(0, false), (1, false), (2, true), (3, true), (4, false), (25, false), (29, true)];
    for (value, prime) in expected {
        assert_eq!(is_prime(value), prime, "value {}", value);
    }
}

#[test]
fn test_prime_set_of_small_dataset() {
    let kernel = NumericKernel::default();
    let values = [2, 3, 4, 17, 18];
    let result = kernel.compute(Chunk::new(0, 5), &values);
    let primes: Vec<Value> = result.outputs.iter().filter_map(|c| c.prime).collect();
    assert_eq!(primes, vec![2, 3, 17]);
    assert_eq!(result.aggregates[PRIME], 3);
}

#[test]
fn test_repeated_values_in_one_chunk() {
    assert_eq!(chunk_frequencies(&[4, 7, 4, 9, 4]), vec![3, 1, 0, 1, 0]);
}

#[test]
fn test_singleton_chunks_report_frequency_one() {
    let kernel = NumericKernel::default();
    let values = [4, 7, 4, 9, 4];
    for (offset, chunk) in values.chunks(1).enumerate() {
        let result = kernel.compute(Chunk::new(offset, 1), chunk);
        assert_eq!(result.outputs[0].frequency, 1);
    }
}

#[test]
fn test_parity_counts_even_values() {
    let kernel = NumericKernel::default();
    let values = create_numeric_values(100, 50, 6);
    let result = kernel.compute(Chunk::new(0, values.len()), &values);
    let even = values.iter().filter(|&&v| v % 2 == 0).count() as u64;
    assert_eq!(result.aggregates[PARITY], even);
}

#[test]
fn test_known_triangle_area() {
    let triangle = Triangle::new(Vertex::new(0.0, 2.0), Vertex::new(1.0, 0.0), Vertex::new(0.0, 0.0));
    assert_relative_eq!(triangle.area(), 1.0);
}

#[test]
fn test_geometric_records_carry_their_area() {
    let kernel = GeometricKernel::new();
    let seeds = kernel.synthesize(64, 12);
    let result = kernel.compute(Chunk::new(0, 64), &seeds);
    for InscribedTriangle { triangle, area } in result.outputs {
        assert_relative_eq!(area, triangle.area());
    }
}

proptest! {
    #[test]
    fn prop_area_is_never_negative(seed in any::<u64>()) {
        let triangle = GeometricKernel::sample(seed);
        prop_assert!(triangle.area() >= 0.0);
    }

    #[test]
    fn prop_arbitrary_triangle_area_is_never_negative(
        coords in proptest::array::uniform6(-100.0f32..100.0)
    ) {
        let [ax, ay, bx, by, cx, cy] = coords;
        let triangle = Triangle::new(Vertex::new(ax, ay), Vertex::new(bx, by), Vertex::new(cx, cy));
        prop_assert!(triangle.area() >= 0.0);
    }

    #[test]
    fn prop_primes_have_no_small_divisor(value in 0u32..2000) {
        if is_prime(value) {
            prop_assert!(value >= 2);
            prop_assert!((2..value).all(|d| value % d != 0));
        } else if value >= 2 {
            prop_assert!((2..value).any(|d| value % d == 0));
        }
    }

    #[test]
    fn prop_frequencies_count_each_value_once(values in proptest::collection::vec(0u32..6, 0..40)) {
        let frequencies = chunk_frequencies(&values);
        let total: u32 = frequencies.iter().sum();
        prop_assert_eq!(total as usize, values.len());
    }
}
