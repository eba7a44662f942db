//! Route definitions for the solving endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    answer_mcq, debug_solution, extract_problem, generate_solution, health, SolveAppState,
};

/// Creates the router for the solving endpoints.
///
/// # Routes
///
/// - `POST /api/extract` - Screenshots or text to a problem statement
/// - `POST /api/generate` - Problem to solution code
/// - `POST /api/debug` - Problem plus failing code screenshots to fixed code
/// - `POST /api/mcq` - Multiple-choice question to an answer
/// - `GET /health` - Liveness and provider info
pub fn solve_routes() -> Router<SolveAppState> {
    Router::new()
        .route("/api/extract", post(extract_problem))
        .route("/api/generate", post(generate_solution))
        .route("/api/debug", post(debug_solution))
        .route("/api/mcq", post(answer_mcq))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::http::solve::FlowSettingsSet;
    use crate::adapters::ocr::MockOcr;

    #[test]
    fn solve_routes_accept_state() {
        let state = SolveAppState::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(MockOcr::new()),
            FlowSettingsSet::default(),
        );
        let _router: Router = solve_routes().with_state(state);
    }
}
