//! Moral alignment on the classic nine-point grid, plus the [`Comparator`]
//! used by alignment and outcome comparisons.

use std::cmp::Ordering;

label_enum! {
    /// Three-way comparison result.
    Comparator {
        LessThan    => "less_than",
        Equals      => "equals",
        GreaterThan => "greater_than",
    }
}

impl Comparator {
    pub fn of<T: Ord>(a: T, b: T) -> Comparator {
        match a.cmp(&b) {
            Ordering::Less    => Comparator::LessThan,
            Ordering::Equal   => Comparator::Equals,
            Ordering::Greater => Comparator::GreaterThan,
        }
    }
}

label_enum! {
    /// Alignment, ordered from most chaotic-evil to most lawful-good.
    Alignment {
        ChaoticEvil    => "chaotic_evil",
        NeutralEvil    => "neutral_evil",
        LawfulEvil     => "lawful_evil",
        ChaoticNeutral => "chaotic_neutral",
        Neutral        => "neutral",
        LawfulNeutral  => "lawful_neutral",
        ChaoticGood    => "chaotic_good",
        NeutralGood    => "neutral_good",
        LawfulGood     => "lawful_good",
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Neutral
    }
}

impl Alignment {
    /// Signed value in `-4..=4`; `Neutral` is zero.
    pub fn value(self) -> i8 {
        self as i8 - 4
    }

    /// Inverse of [`value`](Self::value); out-of-range values clamp.
    pub fn from_value(v: i8) -> Alignment {
        Alignment::ALL[(v.clamp(-4, 4) + 4) as usize]
    }

    /// Equal alignments compare as [`Comparator::Equals`].
    pub fn compare(self, other: Alignment) -> Comparator {
        Comparator::of(self.value(), other.value())
    }

    /// Alignment drifts toward good with a favorable outcome and toward evil
    /// with an unfavorable one.
    pub fn shifted(self, steps: i8) -> Alignment {
        Alignment::from_value(self.value().saturating_add(steps))
    }
}
