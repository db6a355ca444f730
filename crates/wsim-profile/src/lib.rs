//! `wsim-profile`: derived agent profiles and group need rankings.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`level`]   | `TraitLevel`, `InstinctLevel`, `StatBand`, `StatBands`     |
//! | [`profile`] | `Profile`, `NeedSets` (need derivation), `PersonalityTraits` |
//! | [`group`]   | `GroupProfile`: ranked need counts and relative wealth     |
//! | [`cache`]   | `ProfileCache`: shared, `RwLock`-guarded, pull-refreshed   |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `ProfileCache::profiles` computes misses with Rayon      |
//! | `fx-hash`  | FxHash for the cache map                                 |
//! | `serde`    | `Serialize`/`Deserialize` on profiles and levels         |

pub mod cache;
pub mod group;
pub mod level;
pub mod profile;

#[cfg(test)]
mod tests;

pub use cache::ProfileCache;
pub use group::GroupProfile;
pub use level::{InstinctLevel, StatBand, StatBands, TraitLevel};
pub use profile::{NeedSets, PersonalityTraits, Profile};
