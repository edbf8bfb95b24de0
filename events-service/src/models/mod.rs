pub mod account;
pub mod client;
pub mod event;
pub mod token;

pub use account::{Account, Principal, Role};
pub use client::{format_scopes, parse_scopes, Client, GrantType, Scope};
pub use event::Event;
pub use token::{generate_token_value, TokenKind, TokenRecord};
