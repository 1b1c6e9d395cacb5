//! SeaORM entities for campaigns, their owners, groups, candidates and votes,
//! plus the connection lifecycle in [`db`].

pub mod errors;
pub mod db;
pub mod user;
pub mod role;
pub mod user_role;
pub mod group;
pub mod campaign;
pub mod campaign_group;
pub mod candidate;
pub mod vote_user;
pub mod vote_candidate;

#[cfg(test)]
mod tests;
