use crate::schema::availabilities;

#[derive(Queryable, Clone)]
pub struct AvailabilityData {
    pub avid: i64,
    pub fid: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub is_booked: bool,
}

#[derive(Insertable)]
#[table_name = "availabilities"]
pub struct NewAvailability {
    pub fid: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub is_booked: bool,
}

#[derive(AsChangeset, Default)]
#[table_name = "availabilities"]
pub struct UpdateAvailability {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: Option<bool>,
}
