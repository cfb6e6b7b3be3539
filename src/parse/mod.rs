pub mod block_parser;
pub mod block_serializer;
pub mod note;
pub mod span;
pub mod timestamp;

pub use block_parser::{block_id, parse_day_note};
pub use block_serializer::{render_block, render_first_line};
pub use note::Note;
