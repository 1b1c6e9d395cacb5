//! Campaign module: three-layer architecture (domain, repository, service).
//!
//! The service owns the business rules; persistence goes through
//! [`repository::CampaignRepository`], backed by SeaORM in production and by
//! [`repository::mock::MockCampaignRepository`] in tests.

pub mod domain;
pub mod policy;
pub mod repository;
pub mod repo;
pub mod service;

pub use repository::CampaignRepository;
pub use service::CampaignService;
