//! Platform abstraction layer
//!
//! Maps browser input (keys, pointer gestures, on-page buttons) to
//! simulation commands. Kept free of `web_sys` so it builds and tests
//! natively; the browser glue only forwards raw values.

pub mod input;

pub use input::{Button, InputRouter};
