pub mod assert;

use actix_web::web;
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, SqliteConnection};
use r2d2::PooledConnection;

use crate::{error::Error, DbPool};

embed_migrations!();

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
    Ok(pool.get()?)
}

pub fn run_migrations(conn: &SqliteConnection) -> anyhow::Result<()> {
    embedded_migrations::run(conn).context("failed to run embedded migrations")?;
    Ok(())
}
