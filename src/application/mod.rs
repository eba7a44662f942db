//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::solve::{
    AnswerMcqCommand, AnswerMcqHandler, DebugSolutionCommand, DebugSolutionHandler,
    ExtractProblemCommand, ExtractProblemHandler, GenerateSolutionCommand,
    GenerateSolutionHandler, SolveError,
};
