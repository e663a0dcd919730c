// Session: route-group gate, the session reducer, and backend token mirroring.

pub mod context;
pub mod gate;
pub mod handlers;
