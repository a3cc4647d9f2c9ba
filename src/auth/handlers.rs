use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    model::role::Role,
    models::{LoginReqDto, RegisterReq, TokenType, UserSql},
};
use actix_web::{get, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::utils::email_cache;
use crate::utils::email_filter;

/// Inserts a new account linked to its employee record and updates the
/// registered-email filter + cache.
async fn insert_user(
    email: &str,
    password: &str,
    employee_id: u64,
    pool: &MySqlPool,
) -> Result<(), HttpResponse> {
    let hashed = hash_password(password);

    let result = sqlx::query(
        r#"INSERT INTO users (email, password, role_id, employee_id) VALUES (?, ?, ?, ?)"#,
    )
    .bind(email)
    .bind(hashed)
    .bind(Role::Employee as u8)
    .bind(employee_id)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            // Insert succeeded: keep filter and cache in sync.
            email_filter::insert(email);
            email_cache::mark_taken(email).await;
            Ok(())
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(HttpResponse::Conflict().json(json!({
                        "error": "Account already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to insert account");
            Err(HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register account"
            })))
        }
    }
}

/// true  => email AVAILABLE for registration
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1. Cuckoo filter — fast negative: "definitely not registered"
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2. Moka cache — fast positive
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3. Database fallback
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)")
            .bind(&email)
            .fetch_one(pool)
            .await
            .unwrap_or(true); // fail-safe

    !exists
}

/// Account self-provisioning: only an email already present on an active
/// employee record may register, and the new account is linked to that record.
pub async fn register(payload: web::Json<RegisterReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let email = payload.email.trim().to_lowercase();
    let password = &payload.password;

    if email.is_empty() || password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Email and password must not be empty"
        }));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return HttpResponse::Conflict().json(json!({
            "error": "Account already exists for this email"
        }));
    }

    // The directory is pre-seeded by HR; registration never creates employees.
    let employee_id = match sqlx::query_scalar::<_, u64>(
        "SELECT id FROM employees WHERE email = ? AND status = 'active'",
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::Forbidden().json(json!({
                "error": "No active employee record matches this email"
            }));
        }
        Err(e) => {
            error!(error = %e, "Failed to look up employee for registration");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register account"
            }));
        }
    };

    match insert_user(&email, password, employee_id, pool.get_ref()).await {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "Account registered successfully"
        })),
        Err(err_resp) => err_resp,
    }
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().body("Email or password required");
    }

    debug!("Fetching account from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, email, password, role_id, employee_id
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "Account found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: account not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching account");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Generating access token");

    let access_token = generate_access_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    debug!("Generating refresh token");

    let (refresh_token, refresh_claims) = generate_refresh_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    debug!(
        user_id = db_user.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(db_user.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    debug!("Updating last_login_at");

    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
        // intentionally not failing login
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    })
}

#[get("/me")]
pub async fn me(req: HttpRequest) -> impl Responder {
    match req.extensions().get::<AuthUser>() {
        Some(user) => HttpResponse::Ok().json(json!({
            "email": user.email,
            "employee_id": user.employee_id,
        })),
        None => HttpResponse::Unauthorized().body("No user"),
    }
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    // Find the refresh token row; a missing or revoked row ends the session.
    let record = match sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, user_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to look up refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (record_id, record_user_id) = match record {
        Some((id, user_id, revoked)) if !revoked => (id, user_id),
        _ => return HttpResponse::Unauthorized().finish(),
    };

    // Rotation: revoke the old token before issuing a new pair.
    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.employee_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(record_user_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store rotated refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let access_token = generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // Only refresh tokens can log out.
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // Revoke (idempotent).
    let _ = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = TRUE
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .execute(pool.get_ref())
    .await;

    // Success even if the token didn't exist.
    HttpResponse::NoContent().finish()
}
