pub mod auth;

pub use auth::{resolve_principal, MaybeAuth};
