use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub fid: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct AddSlotRequest {
    pub login_token: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct ModifySlotRequest {
    pub login_token: String,
    pub avid: i64,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct DeleteSlotRequest {
    pub login_token: String,
    pub avid: i64,
}

#[derive(Deserialize)]
pub struct SearchSlotRequest {
    pub login_token: String,
}
