use serde::Serialize;

use crate::models::{appointments::Appointment, faculty::FacultyData, students::StudentData};
use crate::utils::format_date;

#[derive(Default, Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub err: String,
    pub apid: i64,
    pub fid: String,
    pub avid: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub purpose: String,
    pub status: String,
}

impl BookResponse {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        BookResponse {
            success: true,
            err: "".to_string(),
            apid: appointment.apid,
            fid: appointment.fid.clone(),
            avid: appointment.avid,
            date: format_date(&appointment.date),
            start_time: appointment.start_time.clone(),
            end_time: appointment.end_time.clone(),
            purpose: appointment.purpose.clone(),
            status: appointment.status.clone(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct StudentAppointItem {
    pub apid: i64,
    pub fid: String,
    pub faculty_name: String,
    pub depart: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub purpose: String,
    pub status: String,
    pub cancelled_by: Option<String>,
    pub cancel_reason: Option<String>,
}

impl StudentAppointItem {
    pub fn new(appointment: Appointment, faculty: FacultyData) -> Self {
        StudentAppointItem {
            apid: appointment.apid,
            fid: faculty.fid,
            faculty_name: faculty.name,
            depart: faculty.department,
            date: format_date(&appointment.date),
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            purpose: appointment.purpose,
            status: appointment.status,
            cancelled_by: appointment.cancelled_by,
            cancel_reason: appointment.cancel_reason,
        }
    }
}

#[derive(Default, Serialize)]
pub struct StudentAppointsResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<StudentAppointItem>,
}

#[derive(Default, Serialize)]
pub struct FacultyAppointItem {
    pub apid: i64,
    pub username: String,
    pub student_name: String,
    pub student_email: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub purpose: String,
    pub status: String,
    pub cancelled_by: Option<String>,
    pub cancel_reason: Option<String>,
}

impl FacultyAppointItem {
    pub fn new(appointment: Appointment, student: StudentData) -> Self {
        FacultyAppointItem {
            apid: appointment.apid,
            username: student.username,
            student_name: student.name,
            student_email: student.email,
            date: format_date(&appointment.date),
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            purpose: appointment.purpose,
            status: appointment.status,
            cancelled_by: appointment.cancelled_by,
            cancel_reason: appointment.cancel_reason,
        }
    }
}

#[derive(Default, Serialize)]
pub struct FacultyAppointsResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<FacultyAppointItem>,
}
