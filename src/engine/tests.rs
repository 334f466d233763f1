use chrono::NaiveDate;
use diesel::prelude::*;

use super::*;
use crate::models::availabilities::NewAvailability;

fn test_conn() -> SqliteConnection {
    let conn = SqliteConnection::establish(":memory:").expect("in-memory db");
    crate::database::run_migrations(&conn).expect("migrations");
    conn
}

fn seed_student(conn: &SqliteConnection, username: &str) {
    use crate::schema::students;

    diesel::insert_into(students::table)
        .values(StudentData {
            username: username.to_string(),
            name: format!("Student {}", username),
            email: format!("{}@campus.edu", username),
            password: "x".to_string(),
        })
        .execute(conn)
        .unwrap();
}

fn seed_faculty(conn: &SqliteConnection, fid: &str) {
    use crate::schema::faculty;

    diesel::insert_into(faculty::table)
        .values(FacultyData {
            fid: fid.to_string(),
            name: format!("Prof. {}", fid),
            email: format!("{}@campus.edu", fid),
            password: "x".to_string(),
            department: "Computer Science".to_string(),
        })
        .execute(conn)
        .unwrap();
}

fn seed_slot(conn: &SqliteConnection, fid: &str, start: &str, end: &str) -> i64 {
    use crate::schema::availabilities;

    diesel::insert_into(availabilities::table)
        .values(NewAvailability {
            fid: fid.to_string(),
            day: "Monday".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_active: true,
            is_booked: false,
        })
        .execute(conn)
        .unwrap();
    diesel::select(last_insert_rowid)
        .get_result::<i64>(conn)
        .unwrap()
}

fn slot(conn: &SqliteConnection, avid: i64) -> AvailabilityData {
    use crate::schema::availabilities;

    availabilities::table
        .find(avid)
        .get_result::<AvailabilityData>(conn)
        .unwrap()
}

fn appointment(conn: &SqliteConnection, apid: i64) -> Appointment {
    load_appointment(conn, apid).unwrap()
}

fn principal(user_id: &str, role: Role) -> Principal {
    Principal {
        user_id: user_id.to_string(),
        role,
    }
}

fn a_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
}

fn setup() -> (SqliteConnection, i64) {
    let conn = test_conn();
    seed_student(&conn, "alice");
    seed_faculty(&conn, "smith");
    let avid = seed_slot(&conn, "smith", "09:00", "10:00");
    (conn, avid)
}

#[test]
fn book_creates_pending_appointment_and_claims_slot() {
    let (conn, avid) = setup();

    let outcome = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "thesis advice",
    )
    .unwrap();

    assert_eq!(outcome.appointment.status, "pending");
    assert_eq!(outcome.appointment.start_time, "09:00");
    assert_eq!(outcome.appointment.end_time, "10:00");
    assert_eq!(outcome.student.username, "alice");
    assert_eq!(outcome.faculty.fid, "smith");
    assert!(slot(&conn, avid).is_booked);
}

#[test]
fn booking_a_claimed_slot_is_a_conflict() {
    let (conn, avid) = setup();
    seed_student(&conn, "bob");

    book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "office hours",
    )
    .unwrap();

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "bob",
        "smith",
        avid,
        a_date(),
        "office hours",
    ) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("already booked")),
        _ => panic!("expected Conflict"),
    }

    // exactly one appointment exists for the slot
    use crate::schema::appointments;
    let count = appointments::table
        .filter(appointments::avid.eq(avid))
        .count()
        .get_result::<i64>(&conn)
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn book_rejects_unknown_entities_in_order() {
    let (conn, avid) = setup();

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "nobody",
        "smith",
        avid,
        a_date(),
        "",
    ) {
        Err(Error::NotFound(msg)) => assert!(msg.contains("student")),
        _ => panic!("expected NotFound"),
    }
    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "ghost",
        avid,
        a_date(),
        "",
    ) {
        Err(Error::NotFound(msg)) => assert!(msg.contains("faculty")),
        _ => panic!("expected NotFound"),
    }
    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid + 100,
        a_date(),
        "",
    ) {
        Err(Error::NotFound(msg)) => assert!(msg.contains("slot")),
        _ => panic!("expected NotFound"),
    }
}

#[test]
fn book_rejects_slot_owned_by_another_faculty() {
    let (conn, avid) = setup();
    seed_faculty(&conn, "jones");

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "jones",
        avid,
        a_date(),
        "",
    ) {
        Err(Error::NotFound(msg)) => assert!(msg.contains("belong")),
        _ => panic!("expected NotFound"),
    }
    assert!(!slot(&conn, avid).is_booked);
}

#[test]
fn book_rejects_inactive_slot() {
    use crate::schema::availabilities;

    let (conn, avid) = setup();
    diesel::update(availabilities::table.find(avid))
        .set(availabilities::is_active.eq(false))
        .execute(&conn)
        .unwrap();

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    ) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("not active")),
        _ => panic!("expected Conflict"),
    }
}

#[test]
fn book_rejects_overlong_purpose() {
    let (conn, avid) = setup();
    let purpose = "x".repeat(MAX_NOTE_LEN + 1);

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        &purpose,
    ) {
        Err(Error::InvalidArgument(_)) => {}
        _ => panic!("expected InvalidArgument"),
    }
}

#[test]
fn per_day_policy_blocks_second_booking_on_same_date() {
    let (conn, avid) = setup();
    let other = seed_slot(&conn, "smith", "11:00", "12:00");

    book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap();

    match book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        other,
        a_date(),
        "",
    ) {
        Err(Error::Conflict(_)) => {}
        _ => panic!("expected Conflict"),
    }
    assert!(!slot(&conn, other).is_booked);

    // a different date is fine
    let next_day = NaiveDate::from_ymd_opt(2026, 9, 8).unwrap();
    book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        other,
        next_day,
        "",
    )
    .unwrap();
}

#[test]
fn overlap_policy_only_blocks_overlapping_windows() {
    let (conn, avid) = setup();
    let adjacent = seed_slot(&conn, "smith", "10:00", "11:00");
    let clashing = seed_slot(&conn, "smith", "09:30", "10:30");

    book(
        &conn,
        DoubleBookingPolicy::Overlap,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap();

    // 10:00-11:00 does not overlap 09:00-10:00
    book(
        &conn,
        DoubleBookingPolicy::Overlap,
        "alice",
        "smith",
        adjacent,
        a_date(),
        "",
    )
    .unwrap();

    // 09:30-10:30 overlaps both
    match book(
        &conn,
        DoubleBookingPolicy::Overlap,
        "alice",
        "smith",
        clashing,
        a_date(),
        "",
    ) {
        Err(Error::Conflict(_)) => {}
        _ => panic!("expected Conflict"),
    }
}

#[test]
fn accept_keeps_slot_booked_and_complete_releases_it() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    let outcome = update_status(&conn, "smith", apid, "accepted", None).unwrap();
    assert_eq!(outcome.appointment.status, "accepted");
    assert!(slot(&conn, avid).is_booked);

    let outcome = complete(&conn, "smith", apid).unwrap();
    assert_eq!(outcome.appointment.status, "completed");
    assert!(!slot(&conn, avid).is_booked);
    assert!(!slot_has_live_booking(&conn, avid).unwrap());
}

#[test]
fn reject_releases_slot_and_stores_reason() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    let outcome = update_status(&conn, "smith", apid, "rejected", Some("conflict")).unwrap();
    assert_eq!(outcome.appointment.status, "rejected");
    assert_eq!(outcome.appointment.cancel_reason.as_deref(), Some("conflict"));
    assert!(!slot(&conn, avid).is_booked);

    // the freed slot can be booked again, even by the same student
    let rebooked = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "second try",
    )
    .unwrap();
    assert_eq!(rebooked.appointment.status, "pending");
    assert!(slot(&conn, avid).is_booked);
}

#[test]
fn update_status_on_non_pending_appointment_never_mutates() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;
    update_status(&conn, "smith", apid, "accepted", None).unwrap();

    match update_status(&conn, "smith", apid, "rejected", None) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("accepted")),
        _ => panic!("expected Conflict"),
    }
    assert_eq!(appointment(&conn, apid).status, "accepted");
    assert!(slot(&conn, avid).is_booked);
}

#[test]
fn update_status_rejects_invalid_status_value() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    match update_status(&conn, "smith", apid, "completed", None) {
        Err(Error::InvalidArgument(_)) => {}
        _ => panic!("expected InvalidArgument"),
    }
    match update_status(&conn, "smith", apid, "maybe", None) {
        Err(Error::InvalidArgument(_)) => {}
        _ => panic!("expected InvalidArgument"),
    }
    assert_eq!(appointment(&conn, apid).status, "pending");
}

#[test]
fn update_status_requires_the_owning_faculty() {
    let (conn, avid) = setup();
    seed_faculty(&conn, "jones");
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    match update_status(&conn, "jones", apid, "accepted", None) {
        Err(Error::Forbidden(_)) => {}
        _ => panic!("expected Forbidden"),
    }
    assert_eq!(appointment(&conn, apid).status, "pending");
}

#[test]
fn cancel_pending_by_student_frees_slot() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    let outcome = cancel(
        &conn,
        &principal("alice", Role::Student),
        apid,
        Some("sick"),
    )
    .unwrap();
    assert_eq!(outcome.appointment.status, "cancelled");
    assert_eq!(outcome.appointment.cancelled_by.as_deref(), Some("student"));
    assert_eq!(outcome.appointment.cancel_reason.as_deref(), Some("sick"));
    assert!(!slot(&conn, avid).is_booked);
}

#[test]
fn cancel_accepted_by_faculty_frees_slot() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;
    update_status(&conn, "smith", apid, "accepted", None).unwrap();

    let outcome = cancel(&conn, &principal("smith", Role::Faculty), apid, None).unwrap();
    assert_eq!(outcome.appointment.status, "cancelled");
    assert_eq!(outcome.appointment.cancelled_by.as_deref(), Some("faculty"));
    assert!(!slot(&conn, avid).is_booked);
}

#[test]
fn cancel_is_forbidden_for_non_parties() {
    let (conn, avid) = setup();
    seed_student(&conn, "bob");
    seed_faculty(&conn, "jones");
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    for actor in &[
        principal("bob", Role::Student),
        principal("jones", Role::Faculty),
        principal("root", Role::Admin),
    ] {
        match cancel(&conn, actor, apid, None) {
            Err(Error::Forbidden(_)) => {}
            _ => panic!("expected Forbidden"),
        }
    }
    assert_eq!(appointment(&conn, apid).status, "pending");
    assert!(slot(&conn, avid).is_booked);
}

#[test]
fn cancel_from_terminal_states_is_a_conflict() {
    let (conn, avid) = setup();
    let alice = principal("alice", Role::Student);

    // rejected
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;
    update_status(&conn, "smith", apid, "rejected", None).unwrap();
    match cancel(&conn, &alice, apid, None) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("rejected")),
        _ => panic!("expected Conflict"),
    }

    // completed
    let next_day = NaiveDate::from_ymd_opt(2026, 9, 8).unwrap();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        next_day,
        "",
    )
    .unwrap()
    .appointment
    .apid;
    update_status(&conn, "smith", apid, "accepted", None).unwrap();
    complete(&conn, "smith", apid).unwrap();
    match cancel(&conn, &alice, apid, None) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("completed")),
        _ => panic!("expected Conflict"),
    }

    // cancelled
    let third_day = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        third_day,
        "",
    )
    .unwrap()
    .appointment
    .apid;
    cancel(&conn, &alice, apid, None).unwrap();
    match cancel(&conn, &alice, apid, None) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("cancelled")),
        _ => panic!("expected Conflict"),
    }
}

#[test]
fn complete_requires_prior_acceptance() {
    let (conn, avid) = setup();
    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;

    match complete(&conn, "smith", apid) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("pending")),
        _ => panic!("expected Conflict"),
    }
    assert_eq!(appointment(&conn, apid).status, "pending");
    assert!(slot(&conn, avid).is_booked);
}

#[test]
fn listings_are_enriched_and_sorted_by_date() {
    let (conn, avid) = setup();
    let other = seed_slot(&conn, "smith", "11:00", "12:00");

    let late = NaiveDate::from_ymd_opt(2026, 9, 21).unwrap();
    let early = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
    book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        late,
        "late one",
    )
    .unwrap();
    book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        other,
        early,
        "early one",
    )
    .unwrap();

    let rows = appointments_for_student(&conn, "alice").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.purpose, "early one");
    assert_eq!(rows[1].0.purpose, "late one");
    assert_eq!(rows[0].1.department, "Computer Science");

    let rows = appointments_for_faculty(&conn, "smith").unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].0.date <= rows[1].0.date);
    assert_eq!(rows[0].1.username, "alice");
}

#[test]
fn slot_guard_tracks_live_bookings_only() {
    let (conn, avid) = setup();
    assert!(!slot_has_live_booking(&conn, avid).unwrap());

    let apid = book(
        &conn,
        DoubleBookingPolicy::PerDay,
        "alice",
        "smith",
        avid,
        a_date(),
        "",
    )
    .unwrap()
    .appointment
    .apid;
    assert!(slot_has_live_booking(&conn, avid).unwrap());

    update_status(&conn, "smith", apid, "accepted", None).unwrap();
    assert!(slot_has_live_booking(&conn, avid).unwrap());

    complete(&conn, "smith", apid).unwrap();
    assert!(!slot_has_live_booking(&conn, avid).unwrap());
}
