//! Domain layer for the TA Directory backend.
//!
//! This crate contains:
//! - Domain models (Identity, Assignment, InvitationEdge, InvitationNode)
//! - Business logic services (profile claiming, invitation graph, bulk invitations)
//! - Storage traits and an in-memory implementation
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
