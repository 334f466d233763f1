//! Notification sink. Delivery is best-effort: a failed send is logged and
//! never turns a committed lifecycle transition into an error.

use tracing::{info, warn};

use crate::engine::{BookOutcome, CancelOutcome, StatusOutcome};
use crate::utils::format_date;

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Default sink when no delivery backend is configured: messages go to the
/// log instead of the wire.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        info!("mail to {}: {} - {}", to, subject, body);
        Ok(())
    }
}

fn deliver(mailer: &dyn Mailer, to: &str, subject: &str, body: &str) {
    if let Err(err) = mailer.send(to, subject, body) {
        warn!("failed to deliver notification to {}: {:#}", to, err);
    }
}

pub fn booking_requested(mailer: &dyn Mailer, outcome: &BookOutcome) {
    let when = format!(
        "{} {}-{}",
        format_date(&outcome.appointment.date),
        outcome.appointment.start_time,
        outcome.appointment.end_time
    );
    deliver(
        mailer,
        &outcome.student.email,
        "Appointment request submitted",
        &format!(
            "Your appointment request with {} on {} has been submitted and is awaiting approval.",
            outcome.faculty.name, when
        ),
    );
    deliver(
        mailer,
        &outcome.faculty.email,
        "New appointment request",
        &format!(
            "{} has requested an appointment on {}: {}",
            outcome.student.name, when, outcome.appointment.purpose
        ),
    );
}

pub fn status_updated(mailer: &dyn Mailer, outcome: &StatusOutcome) {
    let subject = if outcome.appointment.status == "accepted" {
        "Appointment accepted"
    } else {
        "Appointment rejected"
    };
    let mut body = format!(
        "Your appointment on {} {}-{} has been {}.",
        format_date(&outcome.appointment.date),
        outcome.appointment.start_time,
        outcome.appointment.end_time,
        outcome.appointment.status
    );
    if let Some(reason) = &outcome.appointment.cancel_reason {
        body.push_str(&format!(" Reason: {}", reason));
    }
    deliver(mailer, &outcome.student.email, subject, &body);
}

pub fn cancelled(mailer: &dyn Mailer, outcome: &CancelOutcome) {
    let when = format!(
        "{} {}-{}",
        format_date(&outcome.appointment.date),
        outcome.appointment.start_time,
        outcome.appointment.end_time
    );
    let mut body = format!(
        "The appointment on {} was cancelled by the {}.",
        when,
        outcome.cancelled_by.as_str()
    );
    if let Some(reason) = &outcome.appointment.cancel_reason {
        body.push_str(&format!(" Reason: {}", reason));
    }
    deliver(
        mailer,
        &outcome.student.email,
        "Appointment cancelled",
        &body,
    );
    deliver(
        mailer,
        &outcome.faculty.email,
        "Appointment cancelled",
        &body,
    );
}

pub fn completed(mailer: &dyn Mailer, outcome: &StatusOutcome) {
    deliver(
        mailer,
        &outcome.student.email,
        "Appointment completed",
        &format!(
            "Your appointment on {} {}-{} has been marked as completed.",
            format_date(&outcome.appointment.date),
            outcome.appointment.start_time,
            outcome.appointment.end_time
        ),
    );
}
