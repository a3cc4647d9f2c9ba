use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_access_token(
    user_id: u64,
    email: String,
    role: u8,
    employee_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        user_id,
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
        employee_id,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn generate_refresh_token(
    user_id: u64,
    email: String,
    role: u8,
    employee_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> (String, Claims) {
    let claims = Claims {
        user_id,
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Refresh,
        employee_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    (token, claims)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn access_token_round_trips() {
        let token = generate_access_token(
            7,
            "laura.gomez@company.com".into(),
            2,
            Some(41),
            SECRET,
            600,
        );
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "laura.gomez@company.com");
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_id, Some(41));
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_token_carries_unique_jti() {
        let (_, a) = generate_refresh_token(1, "a@x.com".into(), 4, None, SECRET, 600);
        let (_, b) = generate_refresh_token(1, "a@x.com".into(), 4, None, SECRET, 600);
        assert_ne!(a.jti, b.jti);
        assert_eq!(a.token_type, TokenType::Refresh);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = generate_access_token(1, "a@x.com".into(), 4, None, SECRET, 600);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
