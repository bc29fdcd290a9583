pub mod detail;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod models;
pub mod navigation;
pub mod preference;
pub mod query;
pub mod registry;
