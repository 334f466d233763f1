#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod admin;
pub mod booking;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod faculty;
pub mod identity;
pub mod models;
pub mod notify;
pub mod protocol;
pub mod schema;
pub mod student;
pub mod utils;

use diesel::{r2d2::ConnectionManager, SqliteConnection};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
