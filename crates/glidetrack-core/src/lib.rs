pub mod autoplay;
pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod host;
pub mod layout;
pub mod looping;
pub mod pagination;
pub mod position;
pub mod slider;
pub mod thumbnails;
pub mod timers;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, Direction, EasingType, ScrollConfig, SliderConfig, SliderConfigPatch};
pub use drag::{PointerDown, PointerKind};
pub use error::{Error, Result};
pub use events::{EventKind, ListenerId, SliderEvent};
pub use host::{ScrollBehavior, SliderHost};
pub use layout::LayoutConfig;
pub use looping::{NodeKind, TrackNode, TrackPlan};
pub use pagination::{Dot, Navigation, Pagination};
pub use position::Geometry;
pub use slider::{Slider, SliderState};
pub use thumbnails::{SyncPhase, ThumbnailSync};
