// src/app/browser_event_manager.rs
//! ジェスチャー中だけウィンドウに付けるリスナー 👂
//!
//! 押下/ピックアップで付けて、状態機械が Idle に戻ったら外す。
//! タッチのスクロールを止めたいので、全部 `passive: false` で登録する。

use std::sync::{Arc, Mutex};

use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, AddEventListenerOptions, Element, Event, KeyboardEvent, MouseEvent, TouchEvent};

use super::controller::{dispatch, Shared};
use super::dom;
use super::gesture::{GestureEvent, GesturePhase, Point};
use crate::network::lock;

pub(crate) type Listeners = Arc<Mutex<Vec<(&'static str, Closure<dyn FnMut(Event)>)>>>;

type Translate = fn(&Event) -> Option<GestureEvent>;

const WINDOW_EVENTS: [(&str, Translate); 9] = [
    ("mousemove", mouse_move),
    ("mouseup", mouse_up),
    ("dragover", drag_over),
    ("drop", native_drop),
    ("dragend", cancel),
    ("touchmove", touch_move),
    ("touchend", touch_end),
    ("touchcancel", cancel),
    ("keydown", escape),
];

fn mouse_point(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(mouse.client_x() as f64, mouse.client_y() as f64))
}

fn mouse_move(event: &Event) -> Option<GestureEvent> {
    mouse_point(event).map(|point| GestureEvent::Move { point })
}

fn mouse_up(event: &Event) -> Option<GestureEvent> {
    mouse_point(event).map(|point| GestureEvent::Release { point })
}

fn drag_over(event: &Event) -> Option<GestureEvent> {
    // drop を受け付けるには dragover を止める必要がある
    event.prevent_default();
    mouse_move(event)
}

fn native_drop(event: &Event) -> Option<GestureEvent> {
    event.prevent_default();
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let zone = target.closest(crate::config::classes::DROP_ZONE_SELECTOR).ok()??;
    dom::describe_zone_element(&zone).map(|zone| GestureEvent::DropOnZone { zone })
}

// タッチ中は touches、終わったら changedTouches に残る。
// どっちもページのスクロールや後続のクリックを止める 🛑
fn touch_move(event: &Event) -> Option<GestureEvent> {
    event.prevent_default();
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(GestureEvent::Move { point: Point::new(touch.client_x() as f64, touch.client_y() as f64) })
}

fn touch_end(event: &Event) -> Option<GestureEvent> {
    event.prevent_default();
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(GestureEvent::Release { point: Point::new(touch.client_x() as f64, touch.client_y() as f64) })
}

fn cancel(_: &Event) -> Option<GestureEvent> {
    Some(GestureEvent::Cancel)
}

fn escape(event: &Event) -> Option<GestureEvent> {
    let key = event.dyn_ref::<KeyboardEvent>()?;
    (key.key() == "Escape").then_some(GestureEvent::Cancel)
}

/// Attaches or detaches so that listeners exist exactly while a gesture does.
pub(crate) fn sync_listeners(shared: &Shared, listeners: &Listeners) {
    let idle = shared.phase() == GesturePhase::Idle;
    let result = if idle {
        detach_drag_listeners(listeners)
    } else {
        attach_drag_listeners(shared, listeners)
    };
    if let Err(e) = result {
        error!("failed to sync window listeners: {:?}", e);
    }
}

pub(crate) fn attach_drag_listeners(shared: &Shared, listeners: &Listeners) -> Result<(), JsValue> {
    let mut attached = lock(listeners);
    if !attached.is_empty() {
        return Ok(());
    }
    let window = window().ok_or("no window")?;
    // passive のままだと preventDefault が無視される
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    for (name, translate) in WINDOW_EVENTS {
        let shared = shared.clone();
        let listeners_in_closure = Arc::clone(listeners);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if let Some(gesture_event) = translate(&event) {
                dispatch(&shared, gesture_event);
                sync_listeners(&shared, &listeners_in_closure);
            }
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        attached.push((name, closure));
    }
    debug!("attached {} window listeners", attached.len());
    Ok(())
}

pub(crate) fn detach_drag_listeners(listeners: &Listeners) -> Result<(), JsValue> {
    let taken: Vec<_> = lock(listeners).drain(..).collect();
    if taken.is_empty() {
        return Ok(());
    }
    let window = window().ok_or("no window")?;
    for (name, closure) in &taken {
        window.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    }
    debug!("detached {} window listeners", taken.len());
    Ok(())
}
