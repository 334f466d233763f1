use actix_web::web;
use diesel::prelude::*;

use crate::{database::get_db_conn, error::Error, DbPool};

pub async fn assert_faculty(pool: &web::Data<DbPool>, fid: String) -> Result<(), Error> {
    use crate::schema::faculty;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        faculty::table
            .filter(faculty::fid.eq(fid))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .map_err(Error::from)?;

    if res == 0 {
        return Err(Error::NotFound("no such faculty member".to_string()));
    }

    Ok(())
}

pub async fn assert_depart(pool: &web::Data<DbPool>, depart_name: String) -> Result<(), Error> {
    use crate::schema::departments;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        departments::table
            .filter(departments::depart_name.eq(depart_name))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .map_err(Error::from)?;

    if res == 0 {
        return Err(Error::NotFound("no such department".to_string()));
    }

    Ok(())
}
