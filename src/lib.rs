// src/lib.rs

// カードの組み合わせゲーム用、ドラッグ&ドロップのクライアント側エンジン。
// 手の合法性はローカルで先に判定するだけで、最終判断はサーバーがする。
use wasm_bindgen::prelude::*;

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod logic;
pub mod network;
pub mod protocol;
pub mod snapshot;

pub use app::controller::DragDropController;
pub use app::gesture::{GestureEvent, GestureMachine, GestureOutcome, GesturePhase};
pub use components::{Card, CombinationSlot, DragContext, DropTarget, Rank, Suit};
pub use config::GestureConfig;
pub use error::{GestureError, TransportError};
pub use logic::intent::{build_intent, IntentEmitter, IntentTransport};
pub use logic::rules::{can_shrink, is_valid_run, is_valid_trio, resolve, DenyReason, Verdict};
pub use protocol::{Intent, ServerMessage};
pub use snapshot::{TableSnapshot, TableState};

// Wasm がロードされた時に最初に実行される
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    logger::init(level);
    log::info!("combo_drag loaded");
}
