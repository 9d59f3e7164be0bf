//! Type definitions for vouch storage.

mod ids;
mod invitations;
mod persons;

pub use ids::*;
pub use invitations::*;
pub use persons::*;
