mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    database::get_db_conn,
    engine::{self, last_insert_rowid},
    error::Error,
    identity::{self, Role},
    models::availabilities::{AvailabilityData, NewAvailability, UpdateAvailability},
    protocol::SimpleResponse,
    utils::{normalize_time_range, normalize_weekday},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(add_slot)
        .service(modify_slot)
        .service(delete_slot)
        .service(search_slot);
}

crate::post_funcs! {
    (login, "/login", LoginRequest),
    (logout, "/logout", LogoutRequest),
    (add_slot, "/add_slot", AddSlotRequest),
    (modify_slot, "/modify_slot", ModifySlotRequest),
    (delete_slot, "/delete_slot", DeleteSlotRequest),
    (search_slot, "/search_slot", SearchSlotRequest),
}

async fn login_impl(
    pool: web::Data<DbPool>,
    info: web::Json<LoginRequest>,
) -> Result<LoginResponse, Error> {
    use crate::schema::faculty;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;

    let login_token = web::block(move || {
        conn.transaction(|| {
            let hashed_password = identity::hash_password(&info.password);
            let res = faculty::table
                .filter(faculty::fid.eq(&info.fid))
                .filter(faculty::password.eq(&hashed_password))
                .count()
                .get_result::<i64>(&conn)?;
            if res != 1 {
                return Err(Error::Forbidden("wrong fid or password".to_string()));
            }

            identity::issue_token(&conn, &info.fid, Role::Faculty)
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

async fn add_slot_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddSlotRequest>,
) -> Result<AddSlotResponse, Error> {
    use crate::schema::availabilities;

    let info = info.into_inner();
    let principal = identity::authenticate_token(&pool, info.login_token)
        .await?
        .require(Role::Faculty)?;

    let day = normalize_weekday(&info.day)?;
    let (start_time, end_time) = normalize_time_range(&info.start_time, &info.end_time)?;

    let conn = get_db_conn(&pool)?;
    let fid = principal.user_id;
    let avid = web::block(move || {
        conn.transaction(|| {
            let clash = availabilities::table
                .filter(availabilities::fid.eq(&fid))
                .filter(availabilities::day.eq(&day))
                .filter(availabilities::start_time.lt(&end_time))
                .filter(availabilities::end_time.gt(&start_time))
                .count()
                .get_result::<i64>(&conn)?;
            if clash > 0 {
                return Err(Error::Conflict(
                    "slot overlaps an existing slot on the same day".to_string(),
                ));
            }

            let data = NewAvailability {
                fid,
                day,
                start_time,
                end_time,
                is_active: true,
                is_booked: false,
            };
            diesel::insert_into(availabilities::table)
                .values(data)
                .execute(&conn)?;

            let avid = diesel::select(last_insert_rowid).get_result::<i64>(&conn)?;
            Ok(avid)
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(AddSlotResponse {
        success: true,
        err: "".to_string(),
        avid,
    })
}

async fn modify_slot_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ModifySlotRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::availabilities;

    let info = info.into_inner();
    let principal = identity::authenticate_token(&pool, info.login_token.clone())
        .await?
        .require(Role::Faculty)?;

    let day = match &info.day {
        Some(day) => Some(normalize_weekday(day)?),
        None => None,
    };
    if day.is_none()
        && info.start_time.is_none()
        && info.end_time.is_none()
        && info.is_active.is_none()
    {
        return Err(Error::InvalidArgument("nothing to modify".to_string()));
    }

    let conn = get_db_conn(&pool)?;
    let fid = principal.user_id;
    web::block(move || {
        conn.transaction(|| {
            let slot = availabilities::table
                .find(info.avid)
                .get_result::<AvailabilityData>(&conn)
                .optional()?
                .ok_or_else(|| Error::NotFound("no such availability slot".to_string()))?;
            if slot.fid != fid {
                return Err(Error::Forbidden(
                    "slot belongs to another faculty member".to_string(),
                ));
            }
            if engine::slot_has_live_booking(&conn, slot.avid)? {
                return Err(Error::Conflict(
                    "slot has a pending or accepted appointment".to_string(),
                ));
            }

            let mut data = UpdateAvailability {
                day,
                is_active: info.is_active,
                ..Default::default()
            };
            if info.start_time.is_some() || info.end_time.is_some() {
                let start = info.start_time.as_deref().unwrap_or(&slot.start_time);
                let end = info.end_time.as_deref().unwrap_or(&slot.end_time);
                let (start, end) = normalize_time_range(start, end)?;
                data.start_time = Some(start);
                data.end_time = Some(end);
            }

            diesel::update(availabilities::table.find(info.avid))
                .set(&data)
                .execute(&conn)?;

            Ok(())
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn delete_slot_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteSlotRequest>,
) -> Result<SimpleResponse, Error> {
    use crate::schema::availabilities;

    let info = info.into_inner();
    let principal = identity::authenticate_token(&pool, info.login_token.clone())
        .await?
        .require(Role::Faculty)?;

    let conn = get_db_conn(&pool)?;
    let fid = principal.user_id;
    web::block(move || {
        conn.transaction(|| {
            let slot = availabilities::table
                .find(info.avid)
                .get_result::<AvailabilityData>(&conn)
                .optional()?
                .ok_or_else(|| Error::NotFound("no such availability slot".to_string()))?;
            if slot.fid != fid {
                return Err(Error::Forbidden(
                    "slot belongs to another faculty member".to_string(),
                ));
            }
            if engine::slot_has_live_booking(&conn, slot.avid)? {
                return Err(Error::Conflict(
                    "slot has a pending or accepted appointment".to_string(),
                ));
            }

            diesel::delete(availabilities::table.find(info.avid)).execute(&conn)?;
            Ok(())
        })
    })
    .await
    .map_err(Error::from)?;

    Ok(SimpleResponse::ok())
}

async fn search_slot_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchSlotRequest>,
) -> Result<SearchSlotResponse, Error> {
    use crate::schema::availabilities;

    let info = info.into_inner();
    let principal = identity::authenticate_token(&pool, info.login_token)
        .await?
        .require(Role::Faculty)?;

    let conn = get_db_conn(&pool)?;
    let fid = principal.user_id;
    let rows = web::block(move || {
        availabilities::table
            .filter(availabilities::fid.eq(&fid))
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
            is_active: data.is_active,
            is_booked: data.is_booked,
        })
        .collect();

    Ok(SearchSlotResponse {
        success: true,
        err: "".to_string(),
        slots,
    })
}
