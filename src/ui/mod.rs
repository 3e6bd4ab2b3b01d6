pub mod components;
pub mod form;
pub mod pages;
pub mod state;
pub mod styles;
pub mod table;
