// src/app/mod.rs
//! ジェスチャーの状態管理と、それをブラウザに繋ぐ部分。

pub mod affordance;
pub mod browser_event_manager;
pub mod controller;
pub mod dom;
pub mod gesture;
