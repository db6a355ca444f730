//! `wsim-spatial`: world geography, hop queries, spatial indexing, and
//! routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`geography`] | `Geography` (CSR + R-tree), `GeographyBuilder`            |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Propagates `Serialize`/`Deserialize` to `wsim-core` types.   |

pub mod error;
pub mod geography;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use geography::{Geography, GeographyBuilder};
pub use router::{DijkstraRouter, Route, Router};
