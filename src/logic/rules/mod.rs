// src/logic/rules/mod.rs
//! 組み合わせのルールとドロップ可否の判定をまとめるよ！

pub mod combination;
pub mod resolver;


pub use combination::*;
pub use resolver::*;
