// src/lexer/mod.rs
pub mod chartab;
