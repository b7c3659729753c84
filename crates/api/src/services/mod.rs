//! Application services wrapping the domain core.

pub mod email;
pub mod invitations;

pub use email::{EmailError, EmailMessage, EmailService};
pub use invitations::NotifyingInvitationCreator;
