// Student profile intake: normalization of loose input and free-text extraction.
// Every path into the pipeline produces a `StudentProfile` through `normalize`.

pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod prompts;
