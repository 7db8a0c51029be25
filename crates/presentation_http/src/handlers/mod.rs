//! HTTP request handlers

pub mod health;
pub mod speech;
pub mod tips;
