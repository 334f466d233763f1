use crate::schema::students;

#[derive(Queryable, Insertable, Clone)]
#[table_name = "students"]
pub struct StudentData {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}
