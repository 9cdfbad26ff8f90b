//! Core domain logic: validation, authentication and the record store

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod records;
pub mod validation;

#[cfg(test)]
mod tests;
