mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    database::{assert, get_db_conn},
    error::Error,
    identity::{self, Role},
    models::{administrators::AdminData, departments::DepartData, faculty::FacultyData},
    protocol::SimpleResponse,
    utils::get_str_pattern_opt,
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(add_faculty)
        .service(add_depart)
        .service(modify_depart)
        .service(search_depart);
}

crate::post_funcs! {
    (register, "/register", RegisterRequest),
    (login, "/login", LoginRequest),
    (logout, "/logout", LogoutRequest),
    (add_faculty, "/add_faculty", AddFacultyRequest),
    (add_depart, "/add_depart", AddDepartRequest),
    (modify_depart, "/modify_depart", ModifyDepartRequest),
    (search_depart, "/search_depart", SearchDepartRequest),
}

async fn register_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RegisterRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::administrators;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    web::block(move || {
        conn.transaction(|| {
            let res = administrators::table
                .filter(administrators::aid.eq(&info.aid))
                .count()
                .get_result::<i64>(&conn)?;
            if res > 0 {
                return Err(Error::Conflict("aid is already registered".to_string()));
            }

            let data = AdminData {
                aid: info.aid,
                password: identity::hash_password(&info.password),
            };
            diesel::insert_into(administrators::table)
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
    use crate::schema::administrators;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    let login_token = web::block(move || {
        conn.transaction(|| {
            let hashed_password = identity::hash_password(&info.password);
            let res = administrators::table
                .filter(administrators::aid.eq(&info.aid))
                .filter(administrators::password.eq(&hashed_password))
                .count()
                .get_result::<i64>(&conn)?;
            if res != 1 {
                return Err(Error::Forbidden("wrong aid or password".to_string()));
            }

            identity::issue_token(&conn, &info.aid, Role::Admin)
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

async fn add_faculty_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddFacultyRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::faculty;

    let info = info.into_inner();
    identity::authenticate_token(&pool, info.login_token.clone())
        .await?
        .require(Role::Admin)?;
    assert::assert_depart(&pool, info.depart_name.clone()).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let res = faculty::table
                .filter(faculty::fid.eq(&info.fid))
                .count()
                .get_result::<i64>(&conn)?;
            if res > 0 {
                return Err(Error::Conflict("fid is already registered".to_string()));
            }

            let data = FacultyData {
                fid: info.fid,
                name: info.name,
                email: info.email,
                password: identity::hash_password(&info.password),
                department: info.depart_name,
            };
            diesel::insert_into(faculty::table)
                .values(data)
                .execute(&conn)?;

            Ok(())
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn add_depart_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddDepartRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::departments;

    let info = info.into_inner();
    identity::authenticate_token(&pool, info.login_token.clone())
        .await?
        .require(Role::Admin)?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let res = departments::table
                .filter(departments::depart_name.eq(&info.depart_name))
                .count()
                .get_result::<i64>(&conn)?;
            if res > 0 {
                return Err(Error::Conflict("department already exists".to_string()));
            }

            let data = DepartData {
                depart_name: info.depart_name,
                information: info.information,
            };
            diesel::insert_into(departments::table)
                .values(data)
                .execute(&conn)?;

            Ok(())
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn modify_depart_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ModifyDepartRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::departments;

    let info = info.into_inner();
    identity::authenticate_token(&pool, info.login_token.clone())
        .await?
        .require(Role::Admin)?;
    assert::assert_depart(&pool, info.depart_name.clone()).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        diesel::update(departments::table.find(&info.depart_name))
            .set(departments::information.eq(&info.information))
            .execute(&conn)
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn search_depart_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchDepartRequest>,
) -> Result<SearchDepartResponse, Error> {
    use crate::schema::departments;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    let name_pattern = get_str_pattern_opt(info.depart_name);
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);

    let rows = web::block(move || {
        departments::table
            .filter(departments::depart_name.like(name_pattern))
            .order(departments::depart_name.asc())
            .offset(first_index)
            .limit(limit)
            .get_results::<DepartData>(&conn)
    })
    .await
    .map_err(Error::from)?;

    let departments = rows
        .into_iter()
        .map(|data| SearchDepartItem {
            depart_name: data.depart_name,
            information: data.information,
        })
        .collect();

    Ok(SearchDepartResponse {
        success: true,
        err: "".to_string(),
        departments,
    })
}
