// Onboarding: four-step wizard, salary parsing, and the completion/skip sequences
// that write the first profile, preferences and resume.

pub mod completion;
pub mod handlers;
pub mod salary;
pub mod wizard;
