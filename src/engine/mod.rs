//! Appointment lifecycle engine.
//!
//! Every operation runs as a single transaction over the store, so the
//! appointment row and its availability slot can never drift apart: the
//! slot's `is_booked` flag is true exactly while one pending or accepted
//! appointment references it. `book` claims the slot with a conditional
//! update before inserting the appointment, which makes two racing
//! bookings of the same slot resolve to exactly one winner.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::{
    config::DoubleBookingPolicy,
    error::Error,
    identity::{Principal, Role},
    models::{
        appointments::{Appointment, AppointmentStatus, CancelledBy, NewAppointment},
        availabilities::AvailabilityData,
        faculty::FacultyData,
        students::StudentData,
    },
};

no_arg_sql_function!(last_insert_rowid, diesel::sql_types::BigInt);

/// Upper bound for `purpose` and cancel/reject reasons.
pub const MAX_NOTE_LEN: usize = 200;

pub struct BookOutcome {
    pub appointment: Appointment,
    pub student: StudentData,
    pub faculty: FacultyData,
}

pub struct StatusOutcome {
    pub appointment: Appointment,
    pub student: StudentData,
}

pub struct CancelOutcome {
    pub appointment: Appointment,
    pub student: StudentData,
    pub faculty: FacultyData,
    pub cancelled_by: CancelledBy,
}

fn validate_note(field: &str, value: &str) -> Result<(), Error> {
    if value.chars().count() > MAX_NOTE_LEN {
        return Err(Error::InvalidArgument(format!(
            "'{}' must be at most {} characters",
            field, MAX_NOTE_LEN
        )));
    }
    Ok(())
}

fn stored_status(appointment: &Appointment) -> Result<AppointmentStatus, Error> {
    AppointmentStatus::parse(&appointment.status).ok_or_else(|| {
        Error::Unavailable(format!(
            "appointment {} has unknown status '{}'",
            appointment.apid, appointment.status
        ))
    })
}

fn load_appointment(conn: &SqliteConnection, apid: i64) -> Result<Appointment, Error> {
    use crate::schema::appointments;

    appointments::table
        .find(apid)
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or_else(|| Error::NotFound("no such appointment".to_string()))
}

fn load_student(conn: &SqliteConnection, username: &str) -> Result<StudentData, Error> {
    use crate::schema::students;

    students::table
        .find(username)
        .get_result::<StudentData>(conn)
        .optional()?
        .ok_or_else(|| Error::NotFound("no such student".to_string()))
}

fn load_faculty(conn: &SqliteConnection, fid: &str) -> Result<FacultyData, Error> {
    use crate::schema::faculty;

    faculty::table
        .find(fid)
        .get_result::<FacultyData>(conn)
        .optional()?
        .ok_or_else(|| Error::NotFound("no such faculty member".to_string()))
}

fn release_slot(conn: &SqliteConnection, avid: i64) -> Result<(), Error> {
    use crate::schema::availabilities;

    diesel::update(availabilities::table.find(avid))
        .set(availabilities::is_booked.eq(false))
        .execute(conn)?;
    Ok(())
}

fn overlaps(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> bool {
    a_start < b_end && b_start < a_end
}

/// Creates a pending appointment on the given slot. The slot claim, the
/// appointment insert and the guard queries commit or roll back together.
pub fn book(
    conn: &SqliteConnection,
    policy: DoubleBookingPolicy,
    username: &str,
    fid: &str,
    avid: i64,
    date: NaiveDate,
    purpose: &str,
) -> Result<BookOutcome, Error> {
    use crate::schema::{appointments, availabilities};

    validate_note("purpose", purpose)?;

    conn.transaction(|| {
        let student = load_student(conn, username)?;
        let faculty = load_faculty(conn, fid)?;

        let slot = availabilities::table
            .find(avid)
            .get_result::<AvailabilityData>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound("no such availability slot".to_string()))?;
        if slot.fid != fid {
            return Err(Error::NotFound(
                "availability slot does not belong to this faculty member".to_string(),
            ));
        }
        if !slot.is_active {
            return Err(Error::Conflict(
                "availability slot is not active".to_string(),
            ));
        }
        if slot.is_booked {
            return Err(Error::Conflict(
                "availability slot is already booked".to_string(),
            ));
        }

        let live = vec![
            AppointmentStatus::Pending.as_str(),
            AppointmentStatus::Accepted.as_str(),
        ];
        let same_day = appointments::table
            .filter(appointments::username.eq(username))
            .filter(appointments::date.eq(date))
            .filter(appointments::status.eq_any(live))
            .get_results::<Appointment>(conn)?;
        let blocked = match policy {
            DoubleBookingPolicy::PerDay => !same_day.is_empty(),
            DoubleBookingPolicy::Overlap => same_day.iter().any(|existing| {
                overlaps(
                    &existing.start_time,
                    &existing.end_time,
                    &slot.start_time,
                    &slot.end_time,
                )
            }),
        };
        if blocked {
            return Err(Error::Conflict(
                "student already has an appointment booked for this date".to_string(),
            ));
        }

        // claim the slot first; zero affected rows means a concurrent
        // booking won the slot between our read and this write
        let claimed = diesel::update(
            availabilities::table
                .filter(availabilities::avid.eq(avid))
                .filter(availabilities::is_booked.eq(false)),
        )
        .set(availabilities::is_booked.eq(true))
        .execute(conn)?;
        if claimed != 1 {
            return Err(Error::Conflict(
                "availability slot is already booked".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let data = NewAppointment {
            username: username.to_string(),
            fid: fid.to_string(),
            avid,
            date,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            purpose: purpose.to_string(),
            status: AppointmentStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(appointments::table)
            .values(data)
            .execute(conn)?;
        let apid = diesel::select(last_insert_rowid).get_result::<i64>(conn)?;
        let appointment = load_appointment(conn, apid)?;

        Ok(BookOutcome {
            appointment,
            student,
            faculty,
        })
    })
}

/// Faculty accepts or rejects a pending appointment. Rejection releases
/// the slot and stores the optional reason; acceptance keeps the slot
/// booked.
pub fn update_status(
    conn: &SqliteConnection,
    fid: &str,
    apid: i64,
    status: &str,
    reason: Option<&str>,
) -> Result<StatusOutcome, Error> {
    use crate::schema::appointments;

    if let Some(reason) = reason {
        validate_note("reason", reason)?;
    }

    conn.transaction(|| {
        let appointment = load_appointment(conn, apid)?;
        if appointment.fid != fid {
            return Err(Error::Forbidden(
                "appointment belongs to another faculty member".to_string(),
            ));
        }
        if stored_status(&appointment)? != AppointmentStatus::Pending {
            return Err(Error::Conflict(format!(
                "appointment is already {}",
                appointment.status
            )));
        }
        let new_status = match AppointmentStatus::parse(status) {
            Some(status @ AppointmentStatus::Accepted)
            | Some(status @ AppointmentStatus::Rejected) => status,
            _ => {
                return Err(Error::InvalidArgument(
                    "status must be either 'accepted' or 'rejected'".to_string(),
                ))
            }
        };

        let reason = match new_status {
            AppointmentStatus::Rejected => {
                release_slot(conn, appointment.avid)?;
                reason.map(|s| s.to_string())
            }
            _ => None,
        };

        diesel::update(appointments::table.find(apid))
            .set((
                appointments::status.eq(new_status.as_str()),
                appointments::cancel_reason.eq(reason),
                appointments::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let appointment = load_appointment(conn, apid)?;
        let student = load_student(conn, &appointment.username)?;

        Ok(StatusOutcome {
            appointment,
            student,
        })
    })
}

/// Either party cancels a live appointment. The caller is resolved through
/// the principal's role claim, never by probing both identity stores.
pub fn cancel(
    conn: &SqliteConnection,
    principal: &Principal,
    apid: i64,
    reason: Option<&str>,
) -> Result<CancelOutcome, Error> {
    use crate::schema::appointments;

    if let Some(reason) = reason {
        validate_note("reason", reason)?;
    }

    conn.transaction(|| {
        let appointment = load_appointment(conn, apid)?;
        let cancelled_by = match principal.role {
            Role::Student if appointment.username == principal.user_id => CancelledBy::Student,
            Role::Faculty if appointment.fid == principal.user_id => CancelledBy::Faculty,
            _ => {
                return Err(Error::Forbidden(
                    "only the booking student or the owning faculty member may cancel"
                        .to_string(),
                ))
            }
        };
        if stored_status(&appointment)?.is_terminal() {
            return Err(Error::Conflict(format!(
                "appointment is already {}",
                appointment.status
            )));
        }

        release_slot(conn, appointment.avid)?;
        diesel::update(appointments::table.find(apid))
            .set((
                appointments::status.eq(AppointmentStatus::Cancelled.as_str()),
                appointments::cancelled_by.eq(Some(cancelled_by.as_str().to_string())),
                appointments::cancel_reason.eq(reason.map(|s| s.to_string())),
                appointments::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let appointment = load_appointment(conn, apid)?;
        let student = load_student(conn, &appointment.username)?;
        let faculty = load_faculty(conn, &appointment.fid)?;

        Ok(CancelOutcome {
            appointment,
            student,
            faculty,
            cancelled_by,
        })
    })
}

/// Faculty marks an accepted appointment as held. The slot is released;
/// terminal states do not retain the booking lock.
pub fn complete(conn: &SqliteConnection, fid: &str, apid: i64) -> Result<StatusOutcome, Error> {
    use crate::schema::appointments;

    conn.transaction(|| {
        let appointment = load_appointment(conn, apid)?;
        if appointment.fid != fid {
            return Err(Error::Forbidden(
                "appointment belongs to another faculty member".to_string(),
            ));
        }
        if stored_status(&appointment)? != AppointmentStatus::Accepted {
            return Err(Error::Conflict(format!(
                "appointment is {}, not accepted",
                appointment.status
            )));
        }

        release_slot(conn, appointment.avid)?;
        diesel::update(appointments::table.find(apid))
            .set((
                appointments::status.eq(AppointmentStatus::Completed.as_str()),
                appointments::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let appointment = load_appointment(conn, apid)?;
        let student = load_student(conn, &appointment.username)?;

        Ok(StatusOutcome {
            appointment,
            student,
        })
    })
}

pub fn appointments_for_student(
    conn: &SqliteConnection,
    username: &str,
) -> Result<Vec<(Appointment, FacultyData)>, Error> {
    use crate::schema::{appointments, faculty};

    Ok(appointments::table
        .filter(appointments::username.eq(username))
        .inner_join(faculty::table.on(appointments::fid.eq(faculty::fid)))
        .order(appointments::date.asc())
        .then_order_by(appointments::start_time.asc())
        .get_results::<(Appointment, FacultyData)>(conn)?)
}

pub fn appointments_for_faculty(
    conn: &SqliteConnection,
    fid: &str,
) -> Result<Vec<(Appointment, StudentData)>, Error> {
    use crate::schema::{appointments, students};

    Ok(appointments::table
        .filter(appointments::fid.eq(fid))
        .inner_join(students::table.on(appointments::username.eq(students::username)))
        .order(appointments::date.asc())
        .then_order_by(appointments::start_time.asc())
        .get_results::<(Appointment, StudentData)>(conn)?)
}

/// Check-before-mutate contract for availability CRUD: a slot with a
/// pending or accepted appointment must not be updated or deleted.
pub fn slot_has_live_booking(conn: &SqliteConnection, avid: i64) -> Result<bool, Error> {
    use crate::schema::appointments;

    let live = vec![
        AppointmentStatus::Pending.as_str(),
        AppointmentStatus::Accepted.as_str(),
    ];
    let count = appointments::table
        .filter(appointments::avid.eq(avid))
        .filter(appointments::status.eq_any(live))
        .count()
        .get_result::<i64>(conn)?;

    Ok(count > 0)
}

#[cfg(test)]
mod tests;
