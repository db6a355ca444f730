//! `wsim-agent`: agent records and storage for the `wsim` world engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`agent`]   | `Agent`, `Statistics`/`Stat`, `AgentState`, `Instincts`, `Personality`, `Circumstances` |
//! | [`store`]   | `AgentStore` (indexed by `AgentId`)                             |
//! | [`builder`] | `AgentStoreBuilder` (fluent construction)                       |
//! | [`loader`]  | `load_roster_csv`, `load_roster_reader`                         |
//! | [`error`]   | `AgentError`, `AgentResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types. |

pub mod agent;
pub mod builder;
pub mod error;
pub mod loader;
pub mod store;


pub use agent::{
    Agent, AgentKind, AgentState, Circumstances, Gender, Instinct, Instincts, Personality, Stat,
    Statistics,
};
pub use builder::AgentStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use loader::{load_roster_csv, load_roster_reader};
pub use store::AgentStore;
