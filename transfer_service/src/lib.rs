//! Transfer Service Library
//!
//! This library is the core of the Transfer Service: idempotent wallet-to-wallet
//! transfers with double-entry bookkeeping, plus the daily interest calculator.
//! It exports the modules needed by the application binaries and the
//! integration tests.
//!
//! # Modules
//!
//! * `api` - Contains the HTTP interface (routes, DTOs, error mapping).
//! * `config` - Contains the environment-driven application configuration.
//! * `domain` - Contains the domain entities, errors and ports.
//! * `infrastructure` - Contains the Postgres repositories and the Redis cache.
//! * `use_cases` - Contains the application business logic and workflows.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;
