//! `wsim-core`: foundational types for the `wsim` world engine.
//!
//! Every other `wsim-*` crate depends on this one.  It has no `wsim-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `LocationId`, `RealmId`, `ActionResultId`, …    |
//! | [`geo`]         | `Position`, planar distance                                |
//! | [`time`]        | `TimeBox`, `TimeBoxKind`, second constants                 |
//! | [`clock`]       | `Clock`, `ClockTree` (tap / untap / realm clocks)          |
//! | [`rng`]         | `RollSource`, `SimRng`, `ScriptedRolls`                    |
//! | [`needs`]       | `Need`, `NeedCategory` and the four need enums             |
//! | [`interaction`] | `InteractionKind`, `Polarity`, `ThreatKind`, `Outcome`, …  |
//! | [`alignment`]   | `Alignment`, `Comparator`                                  |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

#[macro_use]
mod macros;

pub mod alignment;
pub mod clock;
pub mod error;
pub mod geo;
pub mod ids;
pub mod interaction;
pub mod needs;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use alignment::{Alignment, Comparator};
pub use clock::{Clock, ClockTree};
pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{
    ActionResultId, AgentId, ClockId, EdgeId, InteractionId, LocationId, RealmId, TimeBoxId,
};
pub use interaction::{InteractionKind, Outcome, Polarity, Reason, Role, ThreatKind};
pub use needs::{Esteem, Love, Need, NeedCategory, Physiological, Safety};
pub use rng::{RollSource, ScriptedRolls, SimRng};
pub use time::{TimeBox, TimeBoxKind};
