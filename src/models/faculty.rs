use crate::schema::faculty;

#[derive(Queryable, Insertable, Clone)]
#[table_name = "faculty"]
pub struct FacultyData {
    pub fid: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: String,
}
