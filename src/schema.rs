table! {
    administrators (aid) {
        aid -> Text,
        password -> Text,
    }
}

table! {
    appointments (apid) {
        apid -> BigInt,
        username -> Text,
        fid -> Text,
        avid -> BigInt,
        date -> Date,
        start_time -> Text,
        end_time -> Text,
        purpose -> Text,
        status -> Text,
        cancelled_by -> Nullable<Text>,
        cancel_reason -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    availabilities (avid) {
        avid -> BigInt,
        fid -> Text,
        day -> Text,
        start_time -> Text,
        end_time -> Text,
        is_active -> Bool,
        is_booked -> Bool,
    }
}

table! {
    departments (depart_name) {
        depart_name -> Text,
        information -> Text,
    }
}

table! {
    faculty (fid) {
        fid -> Text,
        name -> Text,
        email -> Text,
        password -> Text,
        department -> Text,
    }
}

table! {
    logins (token) {
        token -> Text,
        user_id -> Text,
        role -> Text,
        login_time -> Timestamp,
    }
}

table! {
    students (username) {
        username -> Text,
        name -> Text,
        email -> Text,
        password -> Text,
    }
}

allow_tables_to_appear_in_same_query!(
    administrators,
    appointments,
    availabilities,
    departments,
    faculty,
    logins,
    students,
);
