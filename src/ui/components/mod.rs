pub mod line_table;
pub mod summary_card;
pub mod toast;
