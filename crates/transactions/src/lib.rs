pub mod handler;
pub mod hooks;
pub mod models;
mod repository;
pub mod service;
