pub mod batch_ctx;
pub mod quiz_flow;

pub use batch_ctx::BatchCtx;
pub use quiz_flow::{BatchRequest, QuizFlow};
