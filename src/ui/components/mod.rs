pub mod confirm_dialog;
pub mod data_table;
pub mod dropdown;
pub mod form_dialog;
pub mod notice;
pub mod pagination;
pub mod toolbar;
pub mod table_view;
