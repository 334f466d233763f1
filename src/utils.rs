#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    match [<$func_name _impl>](pool, info).await {
                        Ok(response) => HttpResponse::Ok().json(response),
                        Err(err) => actix_web::ResponseError::error_response(&err),
                    }
                }
            }
        )+
    };
}

use chrono::{NaiveDate, NaiveTime};

use crate::error::Error;

pub fn parse_date_str(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a YYYY-MM-DD date", s)))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_hhmm(s: &str) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not an HH:MM time", s)))
}

/// Parses and re-renders a slot's time window. Stored times are always
/// zero-padded so they compare correctly as strings.
pub fn normalize_time_range(start: &str, end: &str) -> Result<(String, String), Error> {
    let start = parse_hhmm(start)?;
    let end = parse_hhmm(end)?;
    if end <= start {
        return Err(Error::InvalidArgument(
            "end time must be after start time".to_string(),
        ));
    }
    Ok((
        start.format("%H:%M").to_string(),
        end.format("%H:%M").to_string(),
    ))
}

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn normalize_weekday(s: &str) -> Result<String, Error> {
    WEEKDAYS
        .iter()
        .find(|day| day.eq_ignore_ascii_case(s))
        .map(|day| day.to_string())
        .ok_or_else(|| Error::InvalidArgument(format!("'{}' is not a weekday name", s)))
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", s.as_ref())
}

pub fn get_str_pattern_opt<S: AsRef<str>>(s: Option<S>) -> String {
    match s {
        Some(s) => get_str_pattern(s),
        None => "%".to_string(),
    }
}
