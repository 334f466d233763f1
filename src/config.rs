use anyhow::{bail, Context};

/// How strictly a student's existing appointments block a new booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleBookingPolicy {
    /// At most one live appointment per student per calendar date. This is
    /// the historical behavior and the default.
    PerDay,
    /// Live appointments may share a date as long as their time windows do
    /// not overlap.
    Overlap,
}

impl DoubleBookingPolicy {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "per-day" => Ok(DoubleBookingPolicy::PerDay),
            "overlap" => Ok(DoubleBookingPolicy::Overlap),
            _ => bail!("unknown double-booking policy '{}'", s),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub double_booking: DoubleBookingPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not found")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let double_booking = match std::env::var("DOUBLE_BOOKING_POLICY") {
            Ok(s) => DoubleBookingPolicy::parse(&s)?,
            Err(_) => DoubleBookingPolicy::PerDay,
        };

        Ok(Config {
            database_url,
            bind_addr,
            double_booking,
        })
    }
}
