use actix_web::{web, HttpRequest};
use blake2::{Blake2b, Digest};
use chrono::Utc;
use diesel::prelude::*;

use crate::{database::get_db_conn, error::Error, models::logins::LoginData, DbPool};

const MAX_LOGIN_TIME_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The authenticated caller: an opaque user id plus the role claim issued
/// at login.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    pub fn require(self, role: Role) -> Result<Self, Error> {
        if self.role == role {
            Ok(self)
        } else {
            Err(Error::Forbidden(format!(
                "this operation requires the {} role",
                role.as_str()
            )))
        }
    }
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Blake2b::digest(password.as_bytes()))
}

pub fn generate_login_token(user_id: &str, role: Role) -> String {
    let seed = format!(
        "{}:{}:{}",
        user_id,
        role.as_str(),
        Utc::now().timestamp_micros()
    );
    format!("{:x}", Blake2b::digest(seed.as_bytes()))
}

pub fn issue_token(conn: &SqliteConnection, user_id: &str, role: Role) -> Result<String, Error> {
    use crate::schema::logins;

    let token = generate_login_token(user_id, role);
    let data = LoginData {
        token: token.clone(),
        user_id: user_id.to_string(),
        role: role.as_str().to_string(),
        login_time: Utc::now().naive_utc(),
    };
    diesel::insert_into(logins::table).values(data).execute(conn)?;

    Ok(token)
}

pub fn revoke_token(conn: &SqliteConnection, token: &str) -> Result<(), Error> {
    use crate::schema::logins;

    diesel::delete(logins::table.filter(logins::token.eq(token))).execute(conn)?;
    Ok(())
}

pub fn lookup_principal(conn: &SqliteConnection, token: &str) -> Result<Principal, Error> {
    use crate::schema::logins;

    let data = logins::table
        .filter(logins::token.eq(token))
        .order(logins::login_time.desc())
        .limit(1)
        .get_result::<LoginData>(conn)
        .optional()?
        .ok_or_else(|| Error::Forbidden("no such login token".to_string()))?;

    let time_diff = Utc::now()
        .naive_utc()
        .signed_duration_since(data.login_time);
    if time_diff.num_seconds() > MAX_LOGIN_TIME_SECS {
        return Err(Error::Forbidden("login has expired".to_string()));
    }

    let role = Role::parse(&data.role).ok_or_else(|| {
        Error::Unavailable(format!("unknown role '{}' in login store", data.role))
    })?;

    Ok(Principal {
        user_id: data.user_id,
        role,
    })
}

/// Resolves a token carried in a request body (the glue endpoints).
pub async fn authenticate_token(
    pool: &web::Data<DbPool>,
    token: String,
) -> Result<Principal, Error> {
    let conn = get_db_conn(pool)?;
    let principal = web::block(move || lookup_principal(&conn, &token)).await?;
    Ok(principal)
}

/// Resolves the `Authorization: Bearer` header (the /appointments surface).
pub async fn authenticate_request(
    req: &HttpRequest,
    pool: &web::Data<DbPool>,
) -> Result<Principal, Error> {
    let token = bearer_token(req)?;
    authenticate_token(pool, token).await
}

pub fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Forbidden("missing Authorization header".to_string()))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(Error::Forbidden(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}
