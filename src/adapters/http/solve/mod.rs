//! Solving HTTP endpoints: extract, generate, debug, mcq and health.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DebugRequest, ErrorResponse, ExtractRequest, GenerateRequest, HealthResponse, McqRequest,
};
pub use handlers::{error_response, ApiError, FlowSettingsSet, SolveAppState, REQUEST_ID_HEADER};
pub use routes::solve_routes;
