//! Terminal I/O: in-place block writer and width discovery.

mod live_writer;
pub mod width;

pub use live_writer::LiveWriter;
pub use width::{get_terminal_width, parse_size_output, NativeProbe, SttyProbe, WidthProbe};
