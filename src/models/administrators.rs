use crate::schema::administrators;

#[derive(Queryable, Insertable, Clone)]
#[table_name = "administrators"]
pub struct AdminData {
    pub aid: String,
    pub password: String,
}
