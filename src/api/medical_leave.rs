use crate::auth::auth::AuthUser;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateMedicalLeave {
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Entity that issued the incapacity (EPS, ARL, ...)
    #[schema(example = "Sura EPS")]
    pub issuing_entity: String,
    /// Radicado / filing number of the paper support, if any
    #[schema(example = "INC-2026-00431")]
    pub support_reference: Option<String>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct MedicalLeaveResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub issuing_entity: String,
    #[schema(nullable = true)]
    pub support_reference: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub decided_by: Option<u64>,
    #[schema(nullable = true)]
    pub decision_note: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub decided_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MedicalLeaveFilter {
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct MedicalLeaveListResponse {
    pub data: Vec<MedicalLeaveResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionNote {
    #[schema(example = "Support document verified")]
    pub note: Option<String>,
}

enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Create medical leave
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/medical-leaves",
    request_body = CreateMedicalLeave,
    responses(
        (status = 201, description = "Medical leave submitted"),
        (status = 400, description = "Invalid date range"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "MedicalLeave"
)]
pub async fn create_medical_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateMedicalLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    if payload.issuing_entity.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "issuing_entity must not be empty"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO medical_leaves
            (employee_id, start_date, end_date, issuing_entity, support_reference)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.issuing_entity.trim())
    .bind(&payload.support_reference)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create medical leave");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Medical leave submitted",
        "id": result.last_insert_id(),
        "status": "pending"
    })))
}

/* =========================
List medical leaves
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/medical-leaves",
    params(MedicalLeaveFilter),
    responses(
        (status = 200, description = "Paginated medical leave list", body = MedicalLeaveListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "MedicalLeave"
)]
pub async fn medical_leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MedicalLeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let forced_employee_id = if auth.require_hr_or_admin().is_ok() {
        query.employee_id
    } else {
        Some(auth.require_employee_profile()?)
    };

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = forced_employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM medical_leaves{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count medical leaves");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_id, start_date, end_date, issuing_entity, support_reference,
               status, decided_by, decision_note, decided_at, created_at
        FROM medical_leaves
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, MedicalLeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch medical leave list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(MedicalLeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Get one medical leave
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/medical-leaves/{leave_id}",
    params(("leave_id" = u64, Path, description = "Medical leave ID")),
    responses(
        (status = 200, description = "Medical leave found", body = MedicalLeaveResponse),
        (status = 404, description = "Medical leave not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "MedicalLeave"
)]
pub async fn get_medical_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, MedicalLeaveResponse>(
        r#"
        SELECT id, employee_id, start_date, end_date, issuing_entity, support_reference,
               status, decided_by, decision_note, decided_at, created_at
        FROM medical_leaves
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, leave_id, "Failed to fetch medical leave");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => {
            if !auth.can_view_employee(data.employee_id) {
                return Err(actix_web::error::ErrorForbidden("Not your request"));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Medical leave not found"
        }))),
    }
}

/* =========================
Approve / reject (HR or Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/medical-leaves/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "Medical leave ID")),
    request_body = DecisionNote,
    responses(
        (status = 200, description = "Medical leave approved"),
        (status = 400, description = "Medical leave not found or already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "MedicalLeave"
)]
pub async fn approve_medical_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<DecisionNote>,
) -> actix_web::Result<impl Responder> {
    decide_medical_leave(auth, pool, path.into_inner(), "approved", &body.note).await
}

#[utoipa::path(
    put,
    path = "/api/v1/medical-leaves/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "Medical leave ID")),
    request_body = DecisionNote,
    responses(
        (status = 200, description = "Medical leave rejected"),
        (status = 400, description = "Medical leave not found or already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "MedicalLeave"
)]
pub async fn reject_medical_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<DecisionNote>,
) -> actix_web::Result<impl Responder> {
    decide_medical_leave(auth, pool, path.into_inner(), "rejected", &body.note).await
}

async fn decide_medical_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    leave_id: u64,
    status: &str,
    note: &Option<String>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        UPDATE medical_leaves
        SET status = ?, decided_by = ?, decision_note = ?, decided_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(auth.user_id)
    .bind(note)
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, leave_id, status, "Medical leave decision failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Medical leave not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Medical leave {}", status)
    })))
}
