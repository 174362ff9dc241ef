pub mod interest_repository;
pub mod ledger_repository;
pub mod models;
pub mod transaction_log_repository;
pub mod wallet_repository;
