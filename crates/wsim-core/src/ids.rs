//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Agent and location ids double as
//! dense `Vec` indices; action, interaction, and time-box ids are allocated
//! by whoever owns the corresponding ledger.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": the inner type's `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` for the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent (person or animal) in `AgentStore`.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a geography cell.
    pub struct LocationId(u32);
}

typed_id! {
    /// Index of a directed path between two cells, in CSR order.
    pub struct EdgeId(u32);
}

typed_id! {
    /// A realm: an independently clocked region of the world.
    pub struct RealmId(u32);
}

typed_id! {
    /// Identity of a scheduled unit of work.
    pub struct ActionResultId(u64);
}

typed_id! {
    /// Identity of a recorded interaction between two agents.
    pub struct InteractionId(u64);
}

typed_id! {
    /// Identity of an epoch, event, or increment record.
    pub struct TimeBoxId(u64);
}

typed_id! {
    /// Index of a clock inside a `ClockTree` arena.
    pub struct ClockId(u32);
}
