mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    database::{assert, get_db_conn},
    error::Error,
    identity::{self, Role},
    models::{availabilities::AvailabilityData, faculty::FacultyData, students::StudentData},
    protocol::SimpleResponse,
    utils::get_str_pattern_opt,
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(search_faculty)
        .service(search_slot);
}

crate::post_funcs! {
    (register, "/register", RegisterRequest),
    (login, "/login", LoginRequest),
    (logout, "/logout", LogoutRequest),
    (search_faculty, "/search_faculty", SearchFacultyRequest),
    (search_slot, "/search_slot", SearchSlotRequest),
}

async fn register_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RegisterRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::students;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    web::block(move || {
        conn.transaction(|| {
            let res = students::table
                .filter(students::username.eq(&info.username))
                .count()
                .get_result::<i64>(&conn)?;
            if res > 0 {
                return Err(Error::Conflict(
                    "username is already registered".to_string(),
                ));
            }

            let data = StudentData {
                username: info.username,
                name: info.name,
                email: info.email,
                password: identity::hash_password(&info.password),
            };
            diesel::insert_into(students::table)
                .values(data)
                .execute(&conn)?;

            Ok(())
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn login_impl(
    pool: web::Data<DbPool>,
    info: web::Json<LoginRequest>,
) -> Result<LoginResponse, Error> {
    use crate::schema::students;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    let login_token = web::block(move || {
        conn.transaction(|| {
            let hashed_password = identity::hash_password(&info.password);
            let res = students::table
                .filter(students::username.eq(&info.username))
                .filter(students::password.eq(&hashed_password))
                .count()
                .get_result::<i64>(&conn)?;
            if res != 1 {
                return Err(Error::Forbidden("wrong username or password".to_string()));
            }

            identity::issue_token(&conn, &info.username, Role::Student)
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(LoginResponse {
        success: true,
        err: "".to_string(),
        login_token,
    })
}

async fn logout_impl(
    pool: web::Data<DbPool>,
    info: web::Json<LogoutRequest>,
) -> Result<SimpleResponse, Error> {
    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    web::block(move || identity::revoke_token(&conn, &info.login_token))
        .await
        .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn search_faculty_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchFacultyRequest>,
) -> Result<SearchFacultyResponse, Error> {
    use crate::schema::faculty;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    let depart_pattern = get_str_pattern_opt(info.depart_name);
    let name_pattern = get_str_pattern_opt(info.faculty_name);
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);

    let rows = web::block(move || {
        faculty::table
            .filter(faculty::department.like(depart_pattern))
            .filter(faculty::name.like(name_pattern))
            .order(faculty::name.asc())
            .offset(first_index)
            .limit(limit)
            .get_results::<FacultyData>(&conn)
    })
    .await
    .map_err(Error::from)?;

    let faculty = rows
        .into_iter()
        .map(|data| SearchFacultyItem {
            fid: data.fid,
            name: data.name,
            depart: data.department,
            email: data.email,
        })
        .collect();

    Ok(SearchFacultyResponse {
        success: true,
        err: "".to_string(),
        faculty,
    })
}

async fn search_slot_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchSlotRequest>,
) -> Result<SearchSlotResponse, Error> {
    use crate::schema::availabilities;

    let info = info.into_inner();
    assert::assert_faculty(&pool, info.fid.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let rows = web::block(move || {
        availabilities::table
            .filter(availabilities::fid.eq(&info.fid))
            .filter(availabilities::is_active.eq(true))
            .order(availabilities::day.asc())
            .then_order_by(availabilities::start_time.asc())
            .get_results::<AvailabilityData>(&conn)
    })
    .await
    .map_err(Error::from)?;

    let slots = rows
        .into_iter()
        .map(|data| SearchSlotItem {
            avid: data.avid,
            day: data.day,
            start_time: data.start_time,
            end_time: data.end_time,
            is_booked: data.is_booked,
        })
        .collect();

    Ok(SearchSlotResponse {
        success: true,
        err: "".to_string(),
        slots,
    })
}
