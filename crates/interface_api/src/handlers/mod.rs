//! Request handlers

pub mod health;
pub mod auth;
pub mod customer;
pub mod account;
pub mod transaction;
pub mod credit;
pub mod admin;
