use serde::Serialize;

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub login_token: String,
}

#[derive(Default, Serialize)]
pub struct AddSlotResponse {
    pub success: bool,
    pub err: String,
    pub avid: i64,
}

#[derive(Default, Serialize)]
pub struct SearchSlotItem {
    pub avid: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub is_booked: bool,
}

#[derive(Default, Serialize)]
pub struct SearchSlotResponse {
    pub success: bool,
    pub err: String,
    pub slots: Vec<SearchSlotItem>,
}
