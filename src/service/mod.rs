pub mod prompt;
pub mod relay_service;
