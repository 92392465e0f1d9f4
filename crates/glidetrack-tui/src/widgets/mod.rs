mod event_log;
mod pagination;
mod status_bar;
mod track;

pub use event_log::EventLogWidget;
pub use pagination::{PaginationHit, PaginationWidget};
pub use status_bar::StatusBarWidget;
pub use track::TrackWidget;
