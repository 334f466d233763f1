use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub aid: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub aid: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct AddFacultyRequest {
    pub login_token: String,
    pub fid: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub depart_name: String,
}

#[derive(Deserialize)]
pub struct AddDepartRequest {
    pub login_token: String,
    pub depart_name: String,
    pub information: String,
}

#[derive(Deserialize)]
pub struct ModifyDepartRequest {
    pub login_token: String,
    pub depart_name: String,
    pub information: String,
}

#[derive(Deserialize)]
pub struct SearchDepartRequest {
    pub depart_name: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}
