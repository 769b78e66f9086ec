// TUI widget modules for each screen zone.

pub mod form;
pub mod help_bar;
pub mod result;
pub mod title;
