//! HTTP middleware components.

pub mod logging;
pub mod trace_id;
pub mod user_auth;

pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
pub use user_auth::{require_auth, UserAuth};
