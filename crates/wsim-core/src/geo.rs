//! Planar world coordinates.
//!
//! The world map is a flat grid measured in metres from the realm origin, so
//! plain Euclidean distance is exact.  `f32` keeps sub-metre precision over a
//! few hundred kilometres, which is far larger than any realm.

/// A point on the world grid, in metres east and north of the origin.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub east_m:  f32,
    pub north_m: f32,
}

impl Position {
    #[inline]
    pub fn new(east_m: f32, north_m: f32) -> Self {
        Self { east_m, north_m }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance_m(self, other: Position) -> f32 {
        let de = other.east_m - self.east_m;
        let dn = other.north_m - self.north_m;
        (de * de + dn * dn).sqrt()
    }

    /// Axis-aligned box check.  Cheaper than `distance_m` for quick rejection.
    #[inline]
    pub fn within_box(self, center: Position, half_m: f32) -> bool {
        (self.east_m - center.east_m).abs() <= half_m
            && (self.north_m - center.north_m).abs() <= half_m
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}E, {:.1}N)", self.east_m, self.north_m)
    }
}
