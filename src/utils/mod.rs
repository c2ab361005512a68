pub mod crypto;
pub mod extract;
pub mod request_meta;
pub mod token;
pub mod validation;
