#[macro_use]
extern crate diesel;
#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod http_client;
pub mod models;
pub mod normalizer;
pub mod render;
pub mod schema;
pub mod sync;
pub mod tagging;
pub mod web;
