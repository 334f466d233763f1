use serde::Deserialize;

#[derive(Deserialize)]
pub struct BookRequest {
    pub fid: String,
    pub avid: i64,
    pub date: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
}
