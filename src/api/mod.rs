//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod index;
pub mod middleware;
pub mod router;
pub mod session;
pub mod state;
pub mod types;
pub mod views;

pub use middleware::{CurrentIdentity, RequireUser};
pub use router::create_router_with_state;
pub use state::AppState;
pub use views::{HtmlRenderer, Page, PageContext, PageRenderer};
