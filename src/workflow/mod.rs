pub mod route_flow;
pub mod run_ctx;

pub use route_flow::{RouteFlow, RunReport};
pub use run_ctx::RunCtx;
