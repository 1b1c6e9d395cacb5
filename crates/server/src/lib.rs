//! HTTP surface of the campaign API: router, handlers and error mapping.

pub mod routes;
pub mod startup;
pub mod errors;

pub use startup::run;
