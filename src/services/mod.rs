pub mod auth;
pub mod notifier;

pub use auth::{AuthService, Claims};
pub use notifier::Notifier;
