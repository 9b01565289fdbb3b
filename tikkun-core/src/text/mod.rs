//! Text primitives: tokenization, alignment, script helpers and sentence spans

pub mod aligner;
pub mod script;
pub mod sentence;
pub mod tokenizer;

pub use aligner::{align, WordAligner};
pub use sentence::SentenceLocator;
pub use tokenizer::{tokenize, Token};
