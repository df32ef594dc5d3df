//! Final console reports built by the coordinator.
//!
//! Both reports implement `Display` for the plain-text console layout and
//! `Serialize` for `--json` output.

use crate::core::constants::REPORT_SEPARATOR;
use crate::core::types::{Aggregate, KernelKind, Value};
use crate::kernel::{Classification, InscribedTriangle};
use serde::Serialize;
use std::fmt;

/// Every triangle with its area, in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricReport {
    /// Merged records
    pub triangles: Vec<InscribedTriangle>,
}

impl GeometricReport {
    /// Wrap the merged records.
    pub fn new(triangles: Vec<InscribedTriangle>) -> Self {
        GeometricReport { triangles }
    }
}

impl fmt::Display for GeometricReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", REPORT_SEPARATOR)?;
        for record in &self.triangles {
            let tri = &record.triangle;
            writeln!(f, "{}", tri.r)?;
            writeln!(f, "{}", tri.s)?;
            writeln!(f, "{}", tri.t)?;
            writeln!(f, " AREA: {:.3}", record.area)?;
            writeln!(f, "{}", REPORT_SEPARATOR)?;
        }
        Ok(())
    }
}

/// An element whose chunk-local frequency exceeds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repeated {
    /// Element value
    pub value: Value,
    /// Occurrences within its chunk
    pub frequency: u32,
}

/// Frequency table, primes and the reduced totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericReport {
    /// Number of elements in the run
    pub dataset_size: usize,
    /// Elements with frequency > 1, in dataset order
    pub repeated: Vec<Repeated>,
    /// Prime elements, in dataset order
    pub primes: Vec<Value>,
    /// Reduced count of even elements
    pub parity_count: Aggregate,
    /// Reduced count of prime elements
    pub prime_count: Aggregate,
    /// `prime_count / dataset_size * 100`
    pub prime_percentage: f64,
}

impl NumericReport {
    /// Build the report from merged records and reduced totals.
    pub fn new(outputs: &[Classification], parity_count: Aggregate, prime_count: Aggregate) -> Self {
        let repeated = outputs
            .iter()
            .filter(|c| c.frequency > 1)
            .map(|c| Repeated {
                value: c.value,
                frequency: c.frequency,
            })
            .collect();
        let primes = outputs.iter().filter_map(|c| c.prime).collect();
        let prime_percentage = if outputs.is_empty() {
            0.0
        } else {
            prime_count as f64 / outputs.len() as f64 * 100.0
        };

        NumericReport {
            dataset_size: outputs.len(),
            repeated,
            primes,
            parity_count,
            prime_count,
            prime_percentage,
        }
    }
}

impl fmt::Display for NumericReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Element | Frequency")?;
        for entry in &self.repeated {
            writeln!(f, "{} | {}", entry.value, entry.frequency)?;
        }

        if self.prime_count == 0 {
            writeln!(f, "No prime numbers found.")?;
        } else {
            write!(f, "Primes found:")?;
            for prime in &self.primes {
                write!(f, " {}", prime)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Parity count: {}", self.parity_count)?;
        writeln!(f, "Prime count: {}", self.prime_count)?;
        writeln!(f, "Prime percentage: {:.4}%", self.prime_percentage)
    }
}

/// Report of either kernel, as returned by [`crate::runner::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kernel", rename_all = "lowercase")]
pub enum RunReport {
    /// Geometric run
    Geometric(GeometricReport),
    /// Numeric run
    Numeric(NumericReport),
}

impl RunReport {
    /// Kernel that produced the report.
    pub fn kind(&self) -> KernelKind {
        match self {
            RunReport::Geometric(_) => KernelKind::Geometric,
            RunReport::Numeric(_) => KernelKind::Numeric,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Geometric(report) => fmt::Display::fmt(report, f),
            RunReport::Numeric(report) => fmt::Display::fmt(report, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Triangle, Vertex};

    fn classify(value: Value, frequency: u32) -> Classification {
        Classification {
            value,
            prime: crate::kernel::is_prime(value).then_some(value),
            frequency,
            even: value % 2 == 0,
        }
    }

    #[test]
    fn test_geometric_layout() {
        let triangle = Triangle::new(
            Vertex::new(0.0, 1.0),
            Vertex::new(0.5, 1.0),
            Vertex::new(0.25, 0.0),
        );
        let report = GeometricReport::new(vec![InscribedTriangle {
            triangle,
            area: triangle.area(),
        }]);
        let expected = "-----------------------\n\
                        (0.000,1.000)\n\
                        (0.500,1.000)\n\
                        (0.250,0.000)\n \
                        AREA: 0.250\n\
                        -----------------------\n";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_numeric_layout() {
        let outputs = vec![classify(4, 2), classify(7, 1), classify(4, 0), classify(9, 1)];
        let report = NumericReport::new(&outputs, 2, 1);
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Element | Frequency",
                "4 | 2",
                "Primes found: 7",
                "Parity count: 2",
                "Prime count: 1",
                "Prime percentage: 25.0000%",
            ]
        );
    }

    #[test]
    fn test_numeric_without_primes() {
        let outputs = vec![classify(4, 1), classify(8, 1)];
        let report = NumericReport::new(&outputs, 2, 0);
        let text = report.to_string();
        assert!(text.contains("No prime numbers found."));
        assert!(text.contains("Prime percentage: 0.0000%"));
        assert!(report.repeated.is_empty());
    }

    #[test]
    fn test_reports_serialize() {
        let report = NumericReport::new(&[classify(3, 1)], 0, 1);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["prime_count"], 1);
        assert_eq!(json["primes"][0], 3);

        let report = RunReport::Geometric(GeometricReport::new(Vec::new()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kernel"], "geometric");
        assert!(json["triangles"].as_array().unwrap().is_empty());
        assert_eq!(report.kind(), KernelKind::Geometric);
    }
}
