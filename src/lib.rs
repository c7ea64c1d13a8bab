pub mod config;
pub mod deposits;
pub mod error;
pub mod ledger;
pub mod lineup;
pub mod routes;
pub mod schemas;
pub mod store;
pub mod summary;
pub mod votes;
