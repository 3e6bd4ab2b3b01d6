pub mod client_rows;
pub mod edit_service;
pub mod entity_page;
pub mod import_service;
pub mod query_service;
pub mod table_controller;
