pub mod debounce;
pub mod grid;
pub mod pagination;
pub mod toolbar;
pub mod view;
