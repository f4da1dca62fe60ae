pub mod account;
pub mod domain;
pub mod error;
pub mod protocol;
