//! `wsim-rules`: stochastic resolution rules.
//!
//! Every function here is pure apart from the [`RollSource`] it draws from
//! (and, for [`apply_damage`], the agent it is handed).  None of them return
//! errors: invalid statistics degrade to defaults or to
//! [`RollOutcome::InvalidStatistic`] with a logged warning.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`roll`]   | `roll_percentage`, banding, `stat_check` and the named checks   |
//! | [`combat`] | `resolve_combat`, `calculate_armor_damage`, `ArmorProfile`, …   |
//! | [`save`]   | `roll_saving_throw`, `save_percent`, `SaveKind`                 |
//! | [`damage`] | `apply_damage`, `DamageReport`                                  |
//!
//! [`RollSource`]: wsim_core::RollSource

pub mod combat;
pub mod damage;
pub mod roll;
pub mod save;

#[cfg(test)]
mod tests;

pub use combat::{
    ArmorDamage, ArmorProfile, CombatResult, CriticalLevel, DefenseKind, Engagement,
    calculate_armor_damage, resolve_combat,
};
pub use damage::{DamageReport, apply_damage};
pub use roll::{
    RollOutcome, charisma_check, is_catastrophic_failure, is_natural_success, perception_check,
    reaction_check, roll_percentage, stat_check,
};
pub use save::{SaveKind, roll_saving_throw, save_percent};
