mod requests;
mod responses;

use std::sync::Arc;

use actix_web::{get, post, put, web, HttpRequest, HttpResponse};

use crate::{
    config::Config,
    database::get_db_conn,
    engine,
    error::Error,
    identity::{self, Role},
    notify::{self, Mailer},
    protocol::SimpleResponse,
    utils::parse_date_str,
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(book)
        .service(list_student)
        .service(list_faculty)
        .service(update_status)
        .service(cancel)
        .service(complete);
}

#[post("")]
async fn book(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    mailer: web::Data<Arc<dyn Mailer>>,
    info: web::Json<BookRequest>,
) -> Result<HttpResponse, Error> {
    let principal = identity::authenticate_request(&req, &pool)
        .await?
        .require(Role::Student)?;
    let info = info.into_inner();
    let date = parse_date_str(&info.date)?;
    let policy = config.double_booking;

    let conn = get_db_conn(&pool)?;
    let outcome = web::block(move || {
        engine::book(
            &conn,
            policy,
            &principal.user_id,
            &info.fid,
            info.avid,
            date,
            &info.purpose,
        )
    })
    .await
    .map_err(Error::from)?;

    notify::booking_requested(mailer.get_ref().as_ref(), &outcome);

    Ok(HttpResponse::Created().json(BookResponse::from_appointment(&outcome.appointment)))
}

#[get("/student")]
async fn list_student(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, Error> {
    let principal = identity::authenticate_request(&req, &pool)
        .await?
        .require(Role::Student)?;

    let conn = get_db_conn(&pool)?;
    let rows = web::block(move || engine::appointments_for_student(&conn, &principal.user_id))
        .await
        .map_err(Error::from)?;

    let appointments = rows
        .into_iter()
        .map(|(appointment, faculty)| StudentAppointItem::new(appointment, faculty))
        .collect();

    Ok(HttpResponse::Ok().json(StudentAppointsResponse {
        success: true,
        err: "".to_string(),
        appointments,
    }))
}

#[get("/faculty")]
async fn list_faculty(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, Error> {
    let principal = identity::authenticate_request(&req, &pool)
        .await?
        .require(Role::Faculty)?;

    let conn = get_db_conn(&pool)?;
    let rows = web::block(move || engine::appointments_for_faculty(&conn, &principal.user_id))
        .await
        .map_err(Error::from)?;

    let appointments = rows
        .into_iter()
        .map(|(appointment, student)| FacultyAppointItem::new(appointment, student))
        .collect();

    Ok(HttpResponse::Ok().json(FacultyAppointsResponse {
        success: true,
        err: "".to_string(),
        appointments,
    }))
}

#[put("/{apid}/status")]
async fn update_status(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    mailer: web::Data<Arc<dyn Mailer>>,
    path: web::Path<i64>,
    info: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, Error> {
    let principal = identity::authenticate_request(&req, &pool)
        .await?
        .require(Role::Faculty)?;
    let apid = path.into_inner();
    let info = info.into_inner();

    let conn = get_db_conn(&pool)?;
    let outcome = web::block(move || {
        engine::update_status(
            &conn,
            &principal.user_id,
            apid,
            &info.status,
            info.reason.as_deref(),
        )
    })
    .await
    .map_err(Error::from)?;

    notify::status_updated(mailer.get_ref().as_ref(), &outcome);

    Ok(HttpResponse::Ok().json(SimpleResponse::ok()))
}

#[put("/{apid}/cancel")]
async fn cancel(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    mailer: web::Data<Arc<dyn Mailer>>,
    path: web::Path<i64>,
    info: web::Json<CancelRequest>,
) -> Result<HttpResponse, Error> {
    // both parties may cancel; the engine resolves the actor through the
    // role claim
    let principal = identity::authenticate_request(&req, &pool).await?;
    let apid = path.into_inner();
    let info = info.into_inner();

    let conn = get_db_conn(&pool)?;
    let outcome =
        web::block(move || engine::cancel(&conn, &principal, apid, info.reason.as_deref()))
            .await
            .map_err(Error::from)?;

    notify::cancelled(mailer.get_ref().as_ref(), &outcome);

    Ok(HttpResponse::Ok().json(SimpleResponse::ok()))
}

#[put("/{apid}/complete")]
async fn complete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    mailer: web::Data<Arc<dyn Mailer>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let principal = identity::authenticate_request(&req, &pool)
        .await?
        .require(Role::Faculty)?;
    let apid = path.into_inner();

    let conn = get_db_conn(&pool)?;
    let outcome = web::block(move || engine::complete(&conn, &principal.user_id, apid))
        .await
        .map_err(Error::from)?;

    notify::completed(mailer.get_ref().as_ref(), &outcome);

    Ok(HttpResponse::Ok().json(SimpleResponse::ok()))
}
