// Utility helpers shared by the host and the reporters

pub mod text;

pub use text::{escape_html, indent_string, remove_tty_colors, visible_width, word_wrap};
