pub mod inference;
pub mod tokenizer;
