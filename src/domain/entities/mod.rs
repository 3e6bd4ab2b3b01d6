pub mod catalog;
pub mod column;
pub mod mutation;
pub mod table;
