// src/config/mod.rs
//! ジェスチャーと見た目の設定

pub mod classes;
pub mod gesture;

pub use gesture::GestureConfig;
