//! API middleware components

pub mod identity;
pub mod logging;
pub mod login_required;
pub mod request_context;
pub mod security;

pub use identity::{load_current_user, resolve_identity, CurrentIdentity};
pub use logging::logging_middleware;
pub use login_required::{login_required, RequireUser};
pub use request_context::{request_context_middleware, RequestContext};
pub use security::security_headers_middleware;
