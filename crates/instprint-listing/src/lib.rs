pub mod model;
pub mod render;

// Re-export commonly used types/functions for the CLI
pub use model::{load_listing, parse_addr, parse_listing, Entry, Line, OperandRepr, RegRepr};
pub use render::{encoder_rows, opcode_rows, render_listing, EncoderRow, OpcodeRow};
