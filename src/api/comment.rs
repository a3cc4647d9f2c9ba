use crate::{auth::auth::AuthUser, model::comment::RequestKind};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateComment {
    #[schema(example = "Please attach the appointment confirmation")]
    pub body: String,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct CommentResponse {
    pub id: u64,
    #[schema(example = "permit")]
    pub request_kind: String,
    pub request_id: u64,
    pub author_user_id: u64,
    #[schema(example = "hr@company.com")]
    pub author_email: String,
    pub body: String,
    pub seen_by_requester: bool,
    pub seen_by_reviewer: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct UnreadCount {
    #[schema(example = "permit")]
    pub request_kind: String,
    pub request_id: u64,
    #[schema(example = 2)]
    pub unread: i64,
}

fn parse_kind(kind: &str) -> actix_web::Result<RequestKind> {
    RequestKind::parse(kind)
        .ok_or_else(|| actix_web::error::ErrorBadRequest("Unknown request kind"))
}

/// Requesting employee of the underlying request, if it exists.
async fn request_owner(
    pool: &MySqlPool,
    kind: RequestKind,
    request_id: u64,
) -> actix_web::Result<Option<u64>> {
    let sql = format!("SELECT employee_id FROM {} WHERE id = ?", kind.table());

    sqlx::query_scalar::<_, u64>(&sql)
        .bind(request_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, kind = kind.as_str(), request_id, "Failed to look up request owner");
            ErrorInternalServerError("Internal Server Error")
        })
}

/// Which side of the thread the caller sits on. Owners read as the requester
/// even when they also hold a reviewer role.
enum ThreadParty {
    Requester,
    Reviewer,
}

async fn thread_party(
    auth: &AuthUser,
    pool: &MySqlPool,
    kind: RequestKind,
    request_id: u64,
) -> actix_web::Result<Option<ThreadParty>> {
    let owner = match request_owner(pool, kind, request_id).await? {
        Some(owner) => owner,
        None => return Ok(None),
    };

    if auth.employee_id == Some(owner) {
        return Ok(Some(ThreadParty::Requester));
    }
    if auth.is_reviewer() {
        return Ok(Some(ThreadParty::Reviewer));
    }
    Err(actix_web::error::ErrorForbidden("Not your thread"))
}

/* =========================
List a thread
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/comments/{kind}/{request_id}",
    params(
        ("kind" = String, Path, description = "permit | medical_leave | certification"),
        ("request_id" = u64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Comment thread", body = [CommentResponse]),
        (status = 404, description = "Request not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn list_comments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, u64)>,
) -> actix_web::Result<impl Responder> {
    let (kind, request_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    if thread_party(&auth, pool.get_ref(), kind, request_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Request not found"
        })));
    }

    let comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT c.id, c.request_kind, c.request_id, c.author_user_id, u.email AS author_email,
               c.body, c.seen_by_requester, c.seen_by_reviewer, c.created_at
        FROM request_comments c
        JOIN users u ON u.id = c.author_user_id
        WHERE c.request_kind = ? AND c.request_id = ?
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(kind.as_str())
    .bind(request_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, kind = kind.as_str(), request_id, "Failed to fetch comments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(comments))
}

/* =========================
Post to a thread
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/comments/{kind}/{request_id}",
    params(
        ("kind" = String, Path, description = "permit | medical_leave | certification"),
        ("request_id" = u64, Path, description = "Request ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment posted"),
        (status = 400, description = "Empty comment body"),
        (status = 404, description = "Request not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn create_comment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, u64)>,
    payload: web::Json<CreateComment>,
) -> actix_web::Result<impl Responder> {
    let (kind, request_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    if payload.body.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Comment body must not be empty"
        })));
    }

    let party = match thread_party(&auth, pool.get_ref(), kind, request_id).await? {
        Some(p) => p,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Request not found"
            })));
        }
    };

    // The author's own side starts seen, so their badge only counts the
    // other party's messages.
    let (seen_by_requester, seen_by_reviewer) = match party {
        ThreadParty::Requester => (true, false),
        ThreadParty::Reviewer => (false, true),
    };

    sqlx::query(
        r#"
        INSERT INTO request_comments
            (request_kind, request_id, author_user_id, body, seen_by_requester, seen_by_reviewer)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(kind.as_str())
    .bind(request_id)
    .bind(auth.user_id)
    .bind(payload.body.trim())
    .bind(seen_by_requester)
    .bind(seen_by_reviewer)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, kind = kind.as_str(), request_id, "Failed to post comment");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Comment posted"
    })))
}

/* =========================
Mark a thread read
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/comments/{kind}/{request_id}/seen",
    params(
        ("kind" = String, Path, description = "permit | medical_leave | certification"),
        ("request_id" = u64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Thread marked read for the caller's side"),
        (status = 404, description = "Request not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn mark_thread_seen(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, u64)>,
) -> actix_web::Result<impl Responder> {
    let (kind, request_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    let party = match thread_party(&auth, pool.get_ref(), kind, request_id).await? {
        Some(p) => p,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Request not found"
            })));
        }
    };

    let column = match party {
        ThreadParty::Requester => "seen_by_requester",
        ThreadParty::Reviewer => "seen_by_reviewer",
    };

    let sql = format!(
        "UPDATE request_comments SET {} = TRUE WHERE request_kind = ? AND request_id = ?",
        column
    );

    sqlx::query(&sql)
        .bind(kind.as_str())
        .bind(request_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, kind = kind.as_str(), request_id, "Failed to mark thread seen");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Thread marked read"
    })))
}

/* =========================
Unread badge counts
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/comments/unread",
    responses(
        (status = 200, description = "Unread counts per thread", body = [UnreadCount]),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn unread_counts(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let counts = if auth.is_reviewer() {
        sqlx::query_as::<_, UnreadCount>(
            r#"
            SELECT request_kind, request_id, COUNT(*) AS unread
            FROM request_comments
            WHERE seen_by_reviewer = FALSE
            GROUP BY request_kind, request_id
            "#,
        )
        .fetch_all(pool.get_ref())
        .await
    } else {
        let employee_id = auth.require_employee_profile()?;

        sqlx::query_as::<_, UnreadCount>(
            r#"
            SELECT c.request_kind, c.request_id, COUNT(*) AS unread
            FROM request_comments c
            WHERE c.seen_by_requester = FALSE
              AND (
                (c.request_kind = 'permit' AND EXISTS(
                    SELECT 1 FROM permit_requests p
                    WHERE p.id = c.request_id AND p.employee_id = ?))
                OR (c.request_kind = 'medical_leave' AND EXISTS(
                    SELECT 1 FROM medical_leaves m
                    WHERE m.id = c.request_id AND m.employee_id = ?))
                OR (c.request_kind = 'certification' AND EXISTS(
                    SELECT 1 FROM certifications t
                    WHERE t.id = c.request_id AND t.employee_id = ?))
              )
            GROUP BY c.request_kind, c.request_id
            "#,
        )
        .bind(employee_id)
        .bind(employee_id)
        .bind(employee_id)
        .fetch_all(pool.get_ref())
        .await
    };

    let counts = counts.map_err(|e| {
        error!(error = %e, "Failed to fetch unread counts");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(counts))
}
