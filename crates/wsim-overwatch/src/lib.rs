//! `wsim-overwatch`: the scheduler that watches actions through to the end.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`overwatch`] | `Overwatch`, the pass loop, `ProcessSummary`                    |
//! | [`builder`]   | `OverwatchBuilder`                                              |
//! | [`watch`]     | `WatchSet`, `WatchCategory`, `Watched`                          |
//! | [`hooks`]     | `WatchHook` trait, `HookContext`, `ScheduledActions`            |
//! | [`increment`] | `IncrementRule` trait, `HourlyIncrements`, `FixedIncrements`    |
//! | [`config`]    | `OverwatchConfig` (TOML)                                        |
//! | [`records`]   | how actions and interactions become store records              |
//! | [`error`]     | `OverwatchError`, `OverwatchResult<T>`                          |
//!
//! # Roll-out
//!
//! Before an action runs, the scheduler weighs it against the strongest
//! competing pull on its actor: an imminent threat, or another watched
//! action of the same actor.  The action is pre-empted with probability
//! `(pressure - priority) * rollout_dampening`.  A threat that wins spawns
//! the configured response action (`combat` by default) against its source.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Group profiles computed on Rayon's thread pool             |
//! | `fx-hash`  | FxHash for the watch-set index and the shared caches       |
//! | `sqlite`   | Enables `wsim_store::SqliteStore`                          |

pub mod builder;
pub mod config;
pub mod error;
pub mod hooks;
pub mod increment;
pub mod overwatch;
pub mod records;
pub mod watch;


pub use builder::OverwatchBuilder;
pub use config::OverwatchConfig;
pub use error::{OverwatchError, OverwatchResult};
pub use hooks::{HookContext, ScheduledActions, WatchHook};
pub use increment::{FixedIncrements, HourlyIncrements, IncrementRule};
pub use overwatch::{Overwatch, ProcessSummary};
pub use watch::{WatchCategory, WatchSet, Watched};
