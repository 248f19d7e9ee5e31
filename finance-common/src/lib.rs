#![cfg(not(doctest))]

pub mod clock;
pub mod db;
pub mod messages;
pub mod models;
pub mod schema;
pub mod summary;
pub mod validators;
