pub mod auth;
pub mod authz;
pub mod token;

pub use auth::AuthService;
pub use authz::{authorize, check_owner, AuthContext, Operation};
pub use token::{ClientCredentials, TokenIssuer};
