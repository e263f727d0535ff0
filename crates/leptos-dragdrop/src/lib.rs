//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//!
//! Draggables live in containers (a card inside a column, a column inside a
//! board) at an index. Drop slots are rendered before every draggable and
//! once at the end of a container, so a container of `n` items has slots
//! `0..=n`.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Where a dragged element came from
#[derive(Clone, Debug, PartialEq)]
pub struct DragSource<K> {
    pub container: K,
    pub index: usize,
}

/// Slot a dragged element is hovering over
#[derive(Clone, Debug, PartialEq)]
pub struct DropSlot<K> {
    pub container: K,
    pub index: usize,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

/// Index the dragged element ends up at once it is removed from its source
/// and inserted at `slot`.
pub fn resolve_insert_index<K: PartialEq>(source: &DragSource<K>, slot: &DropSlot<K>) -> usize {
    if source.container == slot.container && slot.index > source.index {
        slot.index - 1
    } else {
        slot.index
    }
}

/// A drop on the slot directly before or after the source changes nothing
pub fn is_noop_drop<K: PartialEq>(source: &DragSource<K>, slot: &DropSlot<K>) -> bool {
    source.container == slot.container
        && (slot.index == source.index || slot.index == source.index + 1)
}

/// DnD state signals
pub struct DndSignals<K: Send + Sync + 'static> {
    pub dragging_read: ReadSignal<Option<DragSource<K>>>,
    pub dragging_write: WriteSignal<Option<DragSource<K>>>,
    pub drop_slot_read: ReadSignal<Option<DropSlot<K>>>,
    pub drop_slot_write: WriteSignal<Option<DropSlot<K>>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending source (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<DragSource<K>>>,
    pub pending_write: WriteSignal<Option<DragSource<K>>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

impl<K: Send + Sync + 'static> Clone for DndSignals<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Send + Sync + 'static> Copy for DndSignals<K> {}

impl<K: Clone + PartialEq + Send + Sync + 'static> DndSignals<K> {
    pub fn is_dragging(&self) -> bool {
        self.dragging_read.get().is_some()
    }

    /// Reactive: is the element at `source` being dragged right now
    pub fn is_dragged(&self, source: &DragSource<K>) -> bool {
        self.dragging_read.with(|d| d.as_ref() == Some(source))
    }

    /// Reactive: is `slot` the current drop target
    pub fn is_active_slot(&self, slot: &DropSlot<K>) -> bool {
        self.drop_slot_read.with(|s| s.as_ref() == Some(slot))
    }

    /// Make `slot` the drop target; ignored unless a drag is in progress
    pub fn hover_slot(&self, slot: DropSlot<K>) {
        if self.dragging_read.with_untracked(Option::is_some) {
            self.drop_slot_write.set(Some(slot));
        }
    }
}

pub fn create_dnd_signals<K: Send + Sync + 'static>() -> DndSignals<K> {
    let (dragging_read, dragging_write) = signal(None::<DragSource<K>>);
    let (drop_slot_read, drop_slot_write) = signal(None::<DropSlot<K>>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<DragSource<K>>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_read,
        dragging_write,
        drop_slot_read,
        drop_slot_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

/// End drag operation
pub fn end_drag<K: Send + Sync + 'static>(dnd: &DndSignals<K>) {
    dnd.dragging_write.set(None);
    dnd.drop_slot_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    // Swallow the click that follows mouseup
    let clear = dnd.drag_just_ended_write;
    gloo_timers::callback::Timeout::new(100, move || clear.set(false)).forget();
}

/// Create mousedown handler for draggable elements
/// Records pending drag with start position
pub fn make_on_mousedown<K>(dnd: DndSignals<K>, source: DragSource<K>) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Ignore if target is an input or button
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some() { return; }
        }
        // Nested draggables (card inside column): innermost wins
        ev.stop_propagation();
        dnd.pending_write.set(Some(source.clone()));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Create mouseenter handler for drop slots
pub fn make_on_slot_mouseenter<K>(dnd: DndSignals<K>, slot: DropSlot<K>) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| dnd.hover_slot(slot.clone())
}

/// Create mouseleave handler
pub fn make_on_mouseleave<K>(dnd: DndSignals<K>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    K: Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            dnd.drop_slot_write.set(None);
        }
    }
}

/// Document-level listeners; removed when dropped
pub struct GlobalListeners {
    mousemove: Closure<dyn FnMut(web_sys::MouseEvent)>,
    mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for GlobalListeners {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.remove_event_listener_with_callback("mousemove", self.mousemove.as_ref().unchecked_ref());
            let _ = doc.remove_event_listener_with_callback("mouseup", self.mouseup.as_ref().unchecked_ref());
        }
    }
}

/// Bind global mousemove (starts drag past the threshold) and mouseup
/// (drop detection). `on_drop` only fires for real drags onto a slot that
/// would change something.
pub fn bind_global_listeners<K, F>(dnd: DndSignals<K>, on_drop: F) -> GlobalListeners
where
    K: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(DragSource<K>, DropSlot<K>) + 'static,
{
    let mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();

        // Pending drag that hasn't started yet
        if pending.is_some() && dnd.dragging_read.with_untracked(Option::is_none) {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();
            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_write.set(pending);
            }
        }
    });

    let mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let slot = dnd.drop_slot_read.get_untracked();

        end_drag(&dnd);

        if let (Some(source), Some(slot)) = (dragging, slot) {
            if !is_noop_drop(&source, &slot) {
                on_drop(source, slot);
            }
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
    }

    GlobalListeners { mousemove, mouseup }
}
