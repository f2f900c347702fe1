// src/error.rs
//! エラー型まとめ。
//!
//! どれも致命的じゃないよ。ジェスチャーの失敗は全部「不正なドロップ」扱いになって、
//! 最終的な判定はサーバーがやり直す 🛡️

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    /// ドラッグ情報がない、または読めない
    #[error("malformed gesture: {0}")]
    MalformedGesture(String),

    /// Pointer is not over a recognized drop zone.
    #[error("no recognized drop zone under the pointer")]
    UnknownTarget,

    /// A combination the check relies on is gone from the current snapshot.
    #[error("combination {0:?} is not in the current snapshot")]
    StaleSnapshot(String),

    /// The send-to-server channel is down.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),
}

/// 送信経路 (WebSocket など) のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,

    #[error("connection is not open")]
    NotOpen,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("failed to serialize message: {0}")]
    Serialize(String),
}

impl From<TransportError> for GestureError {
    fn from(e: TransportError) -> Self {
        GestureError::TransportUnavailable(e.to_string())
    }
}

impl From<GestureError> for JsValue {
    fn from(e: GestureError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

impl From<TransportError> for JsValue {
    fn from(e: TransportError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
