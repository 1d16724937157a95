//! Lambda handlers, one per deployed function

pub mod confirmation_email;
pub mod help_agent;
pub mod helpers;
pub mod notify_organizer;
pub mod parsing;
pub mod pending_confirmation;

// Re-export the handlers for convenience
pub use confirmation_email::{ConfirmationServices, handle_confirmation_email};
pub use help_agent::handle_help_request;
pub use notify_organizer::handle_notify_organizer;
pub use pending_confirmation::handle_pending_confirmation;
