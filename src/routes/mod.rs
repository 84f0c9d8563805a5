//! Navigation surface: resource declarations and the guards wrapping each
//! route group.

pub mod guard;
pub mod resources;

pub use guard::{guest_only, require_auth};
pub use resources::{Action, MenuItem, Resource, Resources};
