//! Validation adapter
//!
//! Converts per-field validation failures into one `VALIDATION_ERROR`
//! record whose details map each snake-cased field name to a message.
//! Works directly with [`validator::ValidationErrors`] or with the neutral
//! [`ValidationFailure`] for other validation sources.

pub mod adapter;
pub mod messages;
pub mod naming;
pub mod violation;

pub use adapter::*;
pub use messages::default_message;
pub use naming::to_snake_case;
pub use violation::*;
