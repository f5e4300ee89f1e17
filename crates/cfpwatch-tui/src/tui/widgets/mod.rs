// TUI widget modules for each dashboard zone and overlay.

pub mod category_bar;
pub mod conference_table;
pub mod controls;
pub mod detail;
pub mod header;
pub mod help;
pub mod picker;
pub mod quit_confirm;
pub mod status_bar;
