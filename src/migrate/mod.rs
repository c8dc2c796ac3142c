//! The two migration procedures
//!
//! - [`migrate_proposals`] rewrites every proposal record under the proposal prefix.
//! - [`migrate_params`] splits the legacy parameter aggregates in the governance namespace.
//!
//! They touch disjoint key ranges and share no state, so they can run in
//! either order.

mod params;
mod proposals;

pub use params::migrate_params;
pub use proposals::{migrate_proposals, migrate_records};
