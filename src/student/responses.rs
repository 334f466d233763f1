use serde::Serialize;

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub login_token: String,
}

#[derive(Default, Serialize)]
pub struct SearchFacultyItem {
    pub fid: String,
    pub name: String,
    pub depart: String,
    pub email: String,
}

#[derive(Default, Serialize)]
pub struct SearchFacultyResponse {
    pub success: bool,
    pub err: String,
    pub faculty: Vec<SearchFacultyItem>,
}

#[derive(Default, Serialize)]
pub struct SearchSlotItem {
    pub avid: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
}

#[derive(Default, Serialize)]
pub struct SearchSlotResponse {
    pub success: bool,
    pub err: String,
    pub slots: Vec<SearchSlotItem>,
}
