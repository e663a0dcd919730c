pub mod application;
pub mod profile;
