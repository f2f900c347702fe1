// src/logic/mod.rs
//! ゲームロジック (描画やブラウザに依存しない部分)

pub mod intent;
pub mod rules;
