//! Slider events and listener registry.

use serde::Serialize;

/// Something observable that happened to a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SliderEvent {
    Ready { index: usize },
    SlideChange { index: usize, previous: usize },
    DragStart { index: usize },
    DragEnd { start_index: usize, index: usize },
    AutoplayStart,
    AutoplayStop,
    Resize,
    Resized,
    Visible { index: usize },
    Hidden { index: usize },
    Destroy,
}

impl SliderEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SliderEvent::Ready { .. } => EventKind::Ready,
            SliderEvent::SlideChange { .. } => EventKind::SlideChange,
            SliderEvent::DragStart { .. } => EventKind::DragStart,
            SliderEvent::DragEnd { .. } => EventKind::DragEnd,
            SliderEvent::AutoplayStart => EventKind::AutoplayStart,
            SliderEvent::AutoplayStop => EventKind::AutoplayStop,
            SliderEvent::Resize => EventKind::Resize,
            SliderEvent::Resized => EventKind::Resized,
            SliderEvent::Visible { .. } => EventKind::Visible,
            SliderEvent::Hidden { .. } => EventKind::Hidden,
            SliderEvent::Destroy => EventKind::Destroy,
        }
    }
}

/// Event name used to subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    SlideChange,
    DragStart,
    DragEnd,
    AutoplayStart,
    AutoplayStop,
    Resize,
    Resized,
    Visible,
    Hidden,
    Destroy,
    /// Receive every event
    Any,
}

impl EventKind {
    fn matches(self, event: &SliderEvent) -> bool {
        self == EventKind::Any || self == event.kind()
    }
}

/// Handle returned by `on`, passed to `off`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&SliderEvent)>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    callback: Callback,
}

/// Ordered listener registry; callbacks run synchronously in registration order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener; returns false when it was not registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: SliderEvent) {
        for listener in self.listeners.iter_mut() {
            if listener.kind.matches(&event) {
                (listener.callback)(&event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_on_filters_by_kind() {
        let mut bus = EventBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.on(EventKind::SlideChange, move |e| sink.borrow_mut().push(*e));

        bus.emit(SliderEvent::Resize);
        bus.emit(SliderEvent::SlideChange {
            index: 2,
            previous: 1,
        });
        assert_eq!(
            *seen.borrow(),
            vec![SliderEvent::SlideChange {
                index: 2,
                previous: 1
            }]
        );
    }

    #[test]
    fn test_off_removes_listener() {
        let mut bus = EventBus::default();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = bus.on(EventKind::Any, move |_| *sink.borrow_mut() += 1);

        bus.emit(SliderEvent::Resized);
        assert!(bus.off(id));
        assert!(!bus.off(id));
        bus.emit(SliderEvent::Resized);
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_string(&SliderEvent::DragEnd {
            start_index: 1,
            index: 3,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"drag-end","start_index":1,"index":3}"#);
    }
}
