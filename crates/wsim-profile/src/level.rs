//! Five-step buckets for continuous traits, instincts, and statistics.
//!
//! All three scales cut `[0, 1]` at the same points:
//!
//! | Value          | Bucket index |
//! |----------------|--------------|
//! | `< 0.2`        | 0            |
//! | `0.2 .. 0.4`   | 1            |
//! | `0.4 .. 0.6`   | 2            |
//! | `0.6 .. 0.8`   | 3            |
//! | `>= 0.8`       | 4            |

use std::fmt;

use wsim_agent::Stat;

fn bucket(value: f64) -> usize {
    if value < 0.2 {
        0
    } else if value < 0.4 {
        1
    } else if value < 0.6 {
        2
    } else if value < 0.8 {
        3
    } else {
        4
    }
}

// ── TraitLevel ────────────────────────────────────────────────────────────────

/// Bucket of a personality trait.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraitLevel {
    VeryLow,
    Low,
    #[default]
    Average,
    High,
    VeryHigh,
}

impl TraitLevel {
    const ORDER: [TraitLevel; 5] = [
        TraitLevel::VeryLow,
        TraitLevel::Low,
        TraitLevel::Average,
        TraitLevel::High,
        TraitLevel::VeryHigh,
    ];

    pub fn from_value(value: f64) -> Self {
        Self::ORDER[bucket(value)]
    }
}

// ── InstinctLevel ─────────────────────────────────────────────────────────────

/// Bucket of an instinct.  Ordered, so thresholds compare with `>=`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstinctLevel {
    #[default]
    Absent,
    Weak,
    Average,
    Strong,
    VeryStrong,
}

impl InstinctLevel {
    const ORDER: [InstinctLevel; 5] = [
        InstinctLevel::Absent,
        InstinctLevel::Weak,
        InstinctLevel::Average,
        InstinctLevel::Strong,
        InstinctLevel::VeryStrong,
    ];

    pub fn from_value(value: f64) -> Self {
        Self::ORDER[bucket(value)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstinctLevel::Absent     => "absent",
            InstinctLevel::Weak       => "weak",
            InstinctLevel::Average    => "average",
            InstinctLevel::Strong     => "strong",
            InstinctLevel::VeryStrong => "very_strong",
        }
    }
}

impl fmt::Display for InstinctLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StatBand ──────────────────────────────────────────────────────────────────

/// Bucket of a 20-point statistic, taken from `stat * 5 / 100`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatBand {
    #[default]
    Lowest,
    Low,
    Moderate,
    High,
    Highest,
}

impl StatBand {
    const ORDER: [StatBand; 5] = [
        StatBand::Lowest,
        StatBand::Low,
        StatBand::Moderate,
        StatBand::High,
        StatBand::Highest,
    ];

    pub fn from_stat(value: i32) -> Self {
        Self::ORDER[bucket((value * 5) as f64 / 100.0)]
    }
}

/// Bands for every [`Stat`], in `Stat::ALL` order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBands(Vec<StatBand>);

impl StatBands {
    pub fn from_statistics(stats: &wsim_agent::Statistics) -> Self {
        Self(Stat::ALL.iter().map(|s| StatBand::from_stat(stats.get(*s))).collect())
    }

    pub fn get(&self, stat: Stat) -> StatBand {
        Stat::ALL
            .iter()
            .position(|s| *s == stat)
            .and_then(|i| self.0.get(i).copied())
            .unwrap_or_default()
    }
}
