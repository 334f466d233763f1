use crate::schema::logins;
use chrono::NaiveDateTime;

#[derive(Queryable, Insertable)]
#[table_name = "logins"]
pub struct LoginData {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub login_time: NaiveDateTime,
}
