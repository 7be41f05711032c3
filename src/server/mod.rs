mod router;
mod state;

pub use router::build_relay_router;
pub use state::ServeState;
