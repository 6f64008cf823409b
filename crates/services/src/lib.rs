#![forbid(unsafe_code)]

pub mod app_services;
pub mod content_service;
pub mod error;
pub mod sessions;

pub use app_services::AppServices;
pub use content_service::{ContentService, ContentSource, parse_content};
pub use error::{AppServicesError, ContentError, SessionError};

pub use sessions::{
    AnswerOutcome, Command, Dispatched, Outcome, SessionController, SessionView, StudySession,
};
