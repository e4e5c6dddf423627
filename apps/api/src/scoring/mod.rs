// Scoring: weighted reduction of the feature vector and the credit decision.
// The pipeline joins the assembler with the engine; handlers only translate HTTP.

pub mod decision;
pub mod engine;
pub mod handlers;
pub mod pipeline;
