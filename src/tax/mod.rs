//! Tax computation module

pub mod gst;

pub use gst::*;
