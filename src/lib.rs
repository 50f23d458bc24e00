//! REST API for tracking research experiments.
//!
//! Requests flow through [`api`] handlers, which validate payloads with
//! [`validation`] and persist through the [`db`] store handle.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod seed;
pub mod validation;
