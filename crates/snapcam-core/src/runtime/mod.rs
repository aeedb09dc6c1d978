mod capture_loop;

pub use capture_loop::{CaptureLoop, LoopExit};
