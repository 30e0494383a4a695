pub mod detail;
pub mod history;
pub mod picker;
