//! Session collaborator
//!
//! The terminal only asks a session whether it is still valid; command bodies
//! use it to reach the portal. `FixturePortal` is the offline backend.

pub mod fixture;
pub mod portal;
pub mod state;

pub use fixture::FixturePortal;
pub use portal::{Absence, AuthToken, Grade, Message, Portal};
pub use state::{Session, SessionHandle};
