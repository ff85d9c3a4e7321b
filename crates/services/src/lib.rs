#![forbid(unsafe_code)]

pub mod app_services;
pub mod attempt_service;
pub mod catalog_service;
pub mod error;
pub mod practice_service;
pub mod result_service;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use attempt_service::{AttemptEvent, StartedAttempt, SubmittedResult, TestAttemptService};
pub use catalog_service::TestCatalogService;
pub use error::{AppServicesError, AttemptError, PracticeError, ResultLookupError, SubmitError};
pub use practice_service::PracticeService;
pub use result_service::ResultService;
