pub mod accounts;
pub mod clients;
pub mod events;
pub mod tokens;

pub use accounts::AccountStore;
pub use clients::ClientRegistry;
pub use events::EventStore;
pub use tokens::TokenStore;
