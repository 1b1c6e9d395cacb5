//! Service layer providing the campaign business operations on top of models.
//! - Separates business logic from data access through [`campaign::CampaignRepository`].
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod campaign;
#[cfg(test)]
pub mod test_support;

pub use campaign::CampaignService;
