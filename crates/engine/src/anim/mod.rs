mod clock;

pub use clock::{advance_clock, AnimationClock, OverrunPolicy};
