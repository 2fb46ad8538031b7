//! Campus - Multi-tenant school management.
//!
//! Institutes, their users and role records, courses with scheduled
//! content, Kolb learning-style classification and course surveys.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
