use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, SqliteConnection};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campus_booking::{
    admin, booking,
    config::Config,
    database, faculty,
    notify::{LogMailer, Mailer},
    student, DbPool,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("campus_booking=debug,actix_web=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool: DbPool = r2d2::Pool::builder()
        .build(manager)
        .context("failed to create database pool")?;

    let conn = pool.get().context("failed to get a database connection")?;
    database::run_migrations(&conn)?;
    drop(conn);

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    info!("listening on {}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .data(config.clone())
            .data(mailer.clone())
            .service(web::scope("/student").configure(student::config))
            .service(web::scope("/faculty").configure(faculty::config))
            .service(web::scope("/admin").configure(admin::config))
            .service(web::scope("/appointments").configure(booking::config))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
