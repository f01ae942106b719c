mod category;
mod interval;
mod lifecycle;
mod runner;

pub use category::next_category;
pub use interval::{
    Category, Interval, IntervalConfig, IntervalState, DEFAULT_LONG_BREAK, DEFAULT_POMODORO,
    DEFAULT_SHORT_BREAK,
};
pub use lifecycle::{current_interval, new_interval, pause, start};
pub use runner::{run, RunOutcome, TICK};
