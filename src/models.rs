use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Deserialize)]
pub struct RegisterReq {
    /// Must match the email of a pre-seeded active employee record.
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub email: String,
    pub password: String,
    pub role_id: u8,
    pub employee_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
