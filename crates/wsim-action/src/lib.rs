//! `wsim-action`: what agents do, and how the scheduler gets it done.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`result`]      | `ActionResult`, `ActionState`, `ActionOutcome`, `ActionTarget`  |
//! | [`interaction`] | `Interaction`, `InteractionSide`, `InteractionLog`              |
//! | [`provider`]    | `ActionProvider` trait, `ActionContext<'a>`, `ActionRegistry`   |
//! | [`observer`]    | `GameObserver` trait, `Notifier` fan-out, `NoopObserver`        |
//! | [`providers`]   | built-ins: `move`, `gather`, `hunt`, `build`, `combat`, `idle`  |
//! | [`error`]       | `ProviderError`, `ProviderResult<T>`                            |
//!
//! # Design notes
//!
//! Providers are stateless and shared (`Send + Sync`); everything that varies
//! per action lives on the [`ActionResult`] (its `steps` counter and its
//! `params` map).  A provider sees the world only through the
//! [`ActionContext`] the scheduler builds for each call, so it can mutate
//! agents, record interactions, and spawn follow-up actions, but never
//! touches the watch-set directly.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on results and interactions      |

pub mod error;
pub mod interaction;
pub mod observer;
pub mod provider;
pub mod providers;
pub mod result;

#[cfg(test)]
mod tests;

pub use error::{ProviderError, ProviderResult};
pub use interaction::{Interaction, InteractionLog, InteractionSide};
pub use observer::{GameObserver, HandlerId, NoopObserver, Notifier};
pub use provider::{ActionContext, ActionProvider, ActionRegistry};
pub use result::{ActionOutcome, ActionResult, ActionState, ActionTarget};
