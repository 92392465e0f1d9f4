//! Autoplay run/pause bookkeeping.
//!
//! The slider owns the timer; this type only decides whether autoplay is
//! running and whether it is currently held back by a drag or hover.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Autoplay {
    running: bool,
    held_by_drag: bool,
    held_by_hover: bool,
}

/// Why autoplay is being held back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    Drag,
    Hover,
}

impl Autoplay {
    /// Start autoplay; returns false when it was already running
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    /// Stop autoplay; returns false when it was not running
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Running and not held back
    pub fn is_active(&self) -> bool {
        self.running && !self.held_by_drag && !self.held_by_hover
    }

    pub fn hold(&mut self, hold: Hold, held: bool) {
        match hold {
            Hold::Drag => self.held_by_drag = held,
            Hold::Hover => self.held_by_hover = held,
        }
    }
}
