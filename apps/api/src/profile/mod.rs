// Profile: personal info, job preferences and the stored resume.

pub mod handlers;
pub mod repository;
pub mod service;
pub mod validation;
