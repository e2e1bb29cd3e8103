//! Event fan-out

mod fanout;

pub use fanout::FanoutEngine;
