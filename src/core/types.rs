//! Core data types shared by the coordinator, the workers and the kernels.
//!
//! Everything that crosses a rank boundary derives `Serialize`/`Deserialize`
//! so it can travel as a bincode payload on the bulk channel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process rank inside a run. Rank 0 is the coordinator.
pub type Rank = usize;

/// Dataset index (position in the full-size arrays).
pub type DataIndex = usize;

/// Element type of the numeric variant.
pub type Value = u32;

/// Scalar aggregate accumulated per process and summed across the run.
pub type Aggregate = u64;

/// Which per-chunk kernel a run applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Random inscribed triangles and their areas
    Geometric,
    /// Parity, primality and chunk-local frequency of integers
    Numeric,
}

impl Default for KernelKind {
    fn default() -> Self {
        KernelKind::Geometric
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Geometric => write!(f, "geometric"),
            KernelKind::Numeric => write!(f, "numeric"),
        }
    }
}

impl std::str::FromStr for KernelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geometric" => Ok(KernelKind::Geometric),
            "numeric" => Ok(KernelKind::Numeric),
            other => Err(format!("unknown kernel: {}", other)),
        }
    }
}

/// Role a process plays in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Rank 0: dispatch, local compute, gather, reduce, report
    Coordinator,
    /// Every other rank: receive, compute, send
    Worker,
}

impl Role {
    /// Role of `rank` given the coordinator rank.
    pub fn of(rank: Rank, coordinator: Rank) -> Self {
        if rank == coordinator {
            Role::Coordinator
        } else {
            Role::Worker
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coordinator => write!(f, "coordinator"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// A 2-D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Abscissa
    pub x: f32,
    /// Ordinate
    pub y: f32,
}

impl Vertex {
    /// Create a vertex from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Vertex { x, y }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3},{:.3})", self.x, self.y)
    }
}

/// Three vertices `{r, s, t}`.
///
/// Generated triangles are inscribed in the right triangle bounded by the
/// axes and the hypotenuse `y = -2x + 2`: `r` lies on the y axis, `t` on the
/// x axis and `s` on the hypotenuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Vertex on the vertical leg
    pub r: Vertex,
    /// Vertex on the hypotenuse
    pub s: Vertex,
    /// Vertex on the horizontal leg
    pub t: Vertex,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(r: Vertex, s: Vertex, t: Vertex) -> Self {
        Triangle { r, s, t }
    }

    /// Shoelace area, always non-negative.
    pub fn area(&self) -> f32 {
        let Triangle { r, s, t } = *self;
        let twice = r.x * (s.y - t.y) + s.x * (t.y - r.y) + t.x * (r.y - s.y);
        twice.abs() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_kind_display_and_parse() {
        assert_eq!(KernelKind::Geometric.to_string(), "geometric");
        assert_eq!(KernelKind::Numeric.to_string(), "numeric");
        assert_eq!("Numeric".parse::<KernelKind>().unwrap(), KernelKind::Numeric);
        assert!("matrix".parse::<KernelKind>().is_err());
    }

    #[test]
    fn test_role_of_rank() {
        assert_eq!(Role::of(0, 0), Role::Coordinator);
        assert_eq!(Role::of(3, 0), Role::Worker);
    }

    #[test]
    fn test_unit_right_triangle_area() {
        let tri = Triangle::new(
            Vertex::new(0.0, 1.0),
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
        );
        assert_relative_eq!(tri.area(), 0.5);
    }

    #[test]
    fn test_area_ignores_orientation() {
        let a = Vertex::new(0.0, 2.0);
        let b = Vertex::new(0.5, 1.0);
        let c = Vertex::new(0.25, 0.0);
        let clockwise = Triangle::new(a, b, c).area();
        let counter = Triangle::new(a, c, b).area();
        assert_relative_eq!(clockwise, counter);
        assert!(clockwise >= 0.0);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_area() {
        let p = Vertex::new(0.5, 1.0);
        assert_eq!(Triangle::new(p, p, p).area(), 0.0);
    }

    #[test]
    fn test_vertex_display() {
        assert_eq!(Vertex::new(0.5, 1.0).to_string(), "(0.500,1.000)");
    }
}
