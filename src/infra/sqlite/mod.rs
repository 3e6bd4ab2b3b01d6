pub mod database;
pub mod entities;
pub mod queries;
pub mod repo;
pub mod schema;
pub mod seed;
