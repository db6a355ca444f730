//! `wsim-assess`: what a group needs and what threatens it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`needs`]      | `NeedEvaluator`: group needs → prioritised action backlog     |
//! | [`threat`]     | `ThreatEvaluator`, `Hazard`, `ThreatView`, `ThreatReport`, `ImminentThreat` |
//! | [`population`] | `PopulationCache`: shared per-location animal lists           |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                   |
//! |-----------|------------------------------------------|
//! | `fx-hash` | FxHash for the population cache map      |

pub mod needs;
pub mod population;
pub mod threat;

#[cfg(test)]
mod tests;

pub use needs::{NeedEvaluator, category_weight};
pub use population::PopulationCache;
pub use threat::{Hazard, ImminentThreat, THREAT_PRIORITY, ThreatEvaluator, ThreatReport, ThreatView};
