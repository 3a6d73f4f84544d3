//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod invitations;
pub mod movies;
pub mod spaces;
pub mod video_extraction;
