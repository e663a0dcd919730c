// Applications: status taxonomy, typed status payloads, reads and client-side writes.
// Records are created and moved through the pipeline by the automation service.

pub mod details;
pub mod handlers;
pub mod repository;
pub mod status;
