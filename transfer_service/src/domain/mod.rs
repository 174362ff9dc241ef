pub mod cache;
pub mod entities;
pub mod error;
pub mod interest;
pub mod repository;
pub mod transfer;
pub mod types;
