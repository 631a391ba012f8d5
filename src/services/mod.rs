//! Business services

pub mod audit;
pub mod auth;
pub mod dealer;
pub mod mailer;
pub mod registry;
pub mod search;

pub use audit::AuditRecorder;
pub use auth::AuthService;
pub use dealer::DealerService;
pub use mailer::Mailer;
pub use registry::RegistryService;
pub use search::SearchService;
