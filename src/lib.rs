//! Shop Backend Library
//!
//! Core components for the shop backend: JWT session authentication with
//! refresh-token rotation, product catalog with image uploads, and orders.

pub mod api;
pub mod auth;
pub mod db;
pub mod order;
pub mod product;
pub mod settings;
pub mod upload;
pub mod user;
