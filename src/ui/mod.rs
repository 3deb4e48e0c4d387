pub mod console;
pub mod format;

pub use console::{CommandSource, OutputSink, StdinCommands, StdoutSink};
