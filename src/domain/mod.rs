pub mod advisory;
pub mod matching;
pub mod product;
pub mod prompts;
pub mod reply;
pub mod rotation;
