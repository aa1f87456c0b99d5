//! Application services layer.

pub mod admin;
pub mod catalog;
pub mod context;
pub mod error;
pub mod export;
pub mod render;
pub mod repos;
pub mod sitemap;
