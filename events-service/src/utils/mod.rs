pub mod password;

pub use password::{Digest, Hasher, Password};
