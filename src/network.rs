// src/network.rs
//! WebSocket 経由でインテントを送り、サーバーからのメッセージを溜めておく。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, MessageEvent, WebSocket};

use crate::error::TransportError;
use crate::logic::intent::IntentTransport;
use crate::protocol::{Intent, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Connecting,
    Error,
}

/// Locks a shared cell, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(cell: &Mutex<T>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(|poisoned| {
        warn!("recovering poisoned lock");
        poisoned.into_inner()
    })
}

/// `{"event": ..., "payload": {...}}` の1フレームにする
pub fn encode_intent(intent: &Intent) -> Result<String, TransportError> {
    serde_json::to_string(intent).map_err(|e| TransportError::Serialize(e.to_string()))
}

pub fn decode_server_message(raw: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(raw)
}

pub struct NetworkManager {
    ws: Option<WebSocket>,
    status_arc: Arc<Mutex<ConnectionStatus>>,
    message_queue_arc: Arc<Mutex<VecDeque<ServerMessage>>>,
    server_url: String,
}

impl NetworkManager {
    pub fn new(server_url: String) -> Self {
        info!("network: server url {}", server_url);
        Self {
            ws: None,
            status_arc: Arc::new(Mutex::new(ConnectionStatus::Disconnected)),
            message_queue_arc: Arc::new(Mutex::new(VecDeque::new())),
            server_url,
        }
    }

    pub fn connect(&mut self) {
        if let Some(ws) = self.ws.take() {
            let _ = ws.close();
            info!("network: closed previous socket before reconnecting");
        }
        if self.get_status() == ConnectionStatus::Connecting {
            info!("network: already connecting");
            return;
        }

        info!("network: connecting to {}", self.server_url);
        *lock(&self.status_arc) = ConnectionStatus::Connecting;

        let ws = match WebSocket::new(&self.server_url) {
            Ok(ws) => ws,
            Err(e) => {
                error!("network: failed to create WebSocket: {:?}", e);
                *lock(&self.status_arc) = ConnectionStatus::Error;
                return;
            }
        };

        let status_open = Arc::clone(&self.status_arc);
        let status_error = Arc::clone(&self.status_arc);
        let status_close = Arc::clone(&self.status_arc);
        let queue = Arc::clone(&self.message_queue_arc);

        let onopen = Closure::wrap(Box::new(move |_| {
            info!("network: connected");
            *lock(&status_open) = ConnectionStatus::Connected;
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
            let Some(raw) = e.data().as_string() else {
                warn!("network: non-text frame ignored");
                return;
            };
            match decode_server_message(&raw) {
                Ok(message) => lock(&queue).push_back(message),
                Err(err) => warn!("network: unparsable message ({}): {}", err, raw),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let onerror = Closure::wrap(Box::new(move |e: ErrorEvent| {
            error!("network: socket error: {}", e.message());
            *lock(&status_error) = ConnectionStatus::Error;
        }) as Box<dyn FnMut(ErrorEvent)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        let onclose = Closure::wrap(Box::new(move |_| {
            info!("network: closed");
            *lock(&status_close) = ConnectionStatus::Disconnected;
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        self.ws = Some(ws);
    }

    pub fn send_message(&self, message: &str) -> Result<(), TransportError> {
        let ws = self.ws.as_ref().ok_or(TransportError::NotConnected)?;
        if ws.ready_state() != WebSocket::OPEN {
            return Err(TransportError::NotOpen);
        }
        ws.send_with_str(message)
            .map_err(|e| TransportError::SendFailed(format!("{:?}", e)))
    }

    pub fn get_status(&self) -> ConnectionStatus {
        *lock(&self.status_arc)
    }

    /// 溜まっているサーバーメッセージを全部取り出す
    pub fn drain_messages(&self) -> Vec<ServerMessage> {
        lock(&self.message_queue_arc).drain(..).collect()
    }

    pub fn disconnect(&mut self) {
        match self.ws.take() {
            Some(ws) => {
                if let Err(e) = ws.close() {
                    warn!("network: error closing socket: {:?}", e);
                }
                *lock(&self.status_arc) = ConnectionStatus::Disconnected;
            }
            None => info!("network: disconnect() while not connected"),
        }
    }
}

impl IntentTransport for NetworkManager {
    fn send_intent(&self, intent: &Intent) -> Result<(), TransportError> {
        let frame = encode_intent(intent)?;
        self.send_message(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_frame_has_event_and_payload() {
        let intent = Intent::TakeTableCard { combination_name: "trio-A".into(), card_position: 2 };
        let frame: serde_json::Value = serde_json::from_str(&encode_intent(&intent).unwrap()).unwrap();
        assert_eq!(
            frame,
            json!({"event": "take_table_card", "payload": {"combination_name": "trio-A", "card_position": 2}})
        );
    }

    #[test]
    fn server_messages_decode() {
        let msg = decode_server_message(r#"{"MoveRejected":{"reason":"not your turn"}}"#);
        assert!(matches!(msg, Ok(ServerMessage::MoveRejected { .. })));
        assert!(decode_server_message("{}").is_err());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let cell = Arc::new(Mutex::new(1));
        let cloned = Arc::clone(&cell);
        let _ = std::panic::catch_unwind(move || {
            let _guard = cloned.lock().unwrap();
            panic!("boom");
        });
        assert_eq!(*lock(&cell), 1);
    }
}
