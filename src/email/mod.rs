//! Transactional email: Resend client and templates

pub mod client;
pub mod templates;

// Re-export main types for convenience
pub use client::{EmailSender, OutgoingEmail, ResendClient};
pub use templates::{RenderedEmail, ReservationContext, render_confirmation};

/// Sender used by the organizer and pending-payment notices.
pub const SQUAREFUND_SENDER: &str = "SquareFund <noreply@aadsdarts.com>";

/// Sender used by the confirmation flow.
pub const CONFIRMATION_SENDER: &str = "Square Fund <noreply@aadsdarts.com>";
