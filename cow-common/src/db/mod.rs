//! Database schema shared by COW services

pub mod init;

pub use init::*;
