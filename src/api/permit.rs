use crate::{
    auth::auth::AuthUser,
    config::Config,
    model::approval::{self, ApprovalStatus, Consensus},
    model::permit::{requested_days, validate_span, PermitType},
    pdf,
};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreatePermit {
    #[schema(example = "paid")]
    pub permit_type: PermitType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "08:00:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(example = "12:00:00", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = "Medical appointment out of town")]
    pub justification: String,
    /// Employee ids of the designated approvers. May be empty; each gets an
    /// independent pending approval record.
    #[schema(example = json!([12, 45]))]
    pub approver_ids: Vec<u64>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct PermitResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 41)]
    pub employee_id: u64,
    #[schema(example = "paid")]
    pub permit_type: String,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub justification: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub document_path: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct ApprovalResponse {
    pub id: u64,
    pub permit_id: u64,
    pub approver_id: u64,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub note: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct PermitDetailResponse {
    pub permit: PermitResponse,
    pub approvals: Vec<ApprovalResponse>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PermitFilter {
    #[schema(example = 41)]
    /// Filter by requesting employee
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[schema(example = "unpaid")]
    pub permit_type: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PermitListResponse {
    pub data: Vec<PermitResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct ApprovalDecisionReq {
    pub decision: Decision,
    #[schema(example = "Coverage arranged for those days")]
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    fn as_str(&self) -> &str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

const PERMIT_COLUMNS: &str = "id, employee_id, permit_type, start_date, end_date, start_time, \
     end_time, justification, status, document_path, resolved_at, created_at";

/* =========================
Create permit request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/permits",
    request_body = CreatePermit,
    responses(
        (status = 201, description = "Permit request submitted", body = Object, example = json!({
            "message": "Permit request submitted",
            "id": 17,
            "status": "pending",
            "requested_days": 2
        })),
        (status = 400, description = "Invalid span or unknown approver"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn create_permit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePermit>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    if let Err(msg) = validate_span(
        payload.start_date,
        payload.end_date,
        payload.start_time,
        payload.end_time,
    ) {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": msg })));
    }

    if payload.justification.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Justification must not be empty"
        })));
    }

    let mut approver_ids = payload.approver_ids.clone();
    approver_ids.sort_unstable();
    approver_ids.dedup();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open permit transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        INSERT INTO permit_requests
            (employee_id, permit_type, start_date, end_date, start_time, end_time, justification)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.permit_type.as_str())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(payload.justification.trim())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create permit request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let permit_id = result.last_insert_id();

    for approver_id in &approver_ids {
        let inserted = sqlx::query(
            r#"INSERT INTO permit_approvals (permit_id, approver_id) VALUES (?, ?)"#,
        )
        .bind(permit_id)
        .bind(approver_id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            let _ = tx.rollback().await;

            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": format!("Unknown approver: {}", approver_id)
                    })));
                }
            }

            error!(error = %e, permit_id, approver_id, "Failed to create approval record");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, permit_id, "Failed to commit permit request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Permit request submitted",
        "id": permit_id,
        "status": "pending",
        "requested_days": requested_days(payload.start_date, payload.end_date)
    })))
}

/* =========================
List permits
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/permits",
    params(PermitFilter),
    responses(
        (status = 200, description = "Paginated permit list", body = PermitListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn permit_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PermitFilter>,
) -> actix_web::Result<impl Responder> {
    // Staff browse everything; everyone else only their own requests.
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

    if let Some(permit_type) = query.permit_type.as_deref() {
        where_sql.push_str(" AND permit_type = ?");
        args.push(FilterValue::Str(permit_type));
    }

    let count_sql = format!("SELECT COUNT(*) FROM permit_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count permit requests");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT {} FROM permit_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        PERMIT_COLUMNS, where_sql
    );

    let mut data_q = sqlx::query_as::<_, PermitResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let permits = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch permit list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PermitListResponse {
        data: permits,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Approver queue
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/permits/assigned",
    responses(
        (status = 200, description = "Permits awaiting the caller's decision", body = [PermitResponse]),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn assigned_permits(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let approver_id = auth.require_employee_profile()?;

    let sql = format!(
        r#"
        SELECT {} FROM permit_requests p
        WHERE p.status = 'pending'
          AND EXISTS(
            SELECT 1 FROM permit_approvals pa
            WHERE pa.permit_id = p.id AND pa.approver_id = ? AND pa.status = 'pending'
          )
        ORDER BY p.created_at ASC
        "#,
        PERMIT_COLUMNS
    );

    let permits = sqlx::query_as::<_, PermitResponse>(&sql)
        .bind(approver_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, approver_id, "Failed to fetch assigned permits");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(permits))
}

/* =========================
Permit details
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/permits/{permit_id}",
    params(("permit_id" = u64, Path, description = "Permit request ID")),
    responses(
        (status = 200, description = "Permit with its approval records", body = PermitDetailResponse),
        (status = 404, description = "Permit not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn get_permit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let permit_id = path.into_inner();

    let sql = format!("SELECT {} FROM permit_requests WHERE id = ?", PERMIT_COLUMNS);
    let permit = sqlx::query_as::<_, PermitResponse>(&sql)
        .bind(permit_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, permit_id, "Failed to fetch permit");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let permit = match permit {
        Some(p) => p,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Permit not found"
            })));
        }
    };

    if !can_view_permit(&auth, pool.get_ref(), permit_id, permit.employee_id).await? {
        return Err(actix_web::error::ErrorForbidden("Not your request"));
    }

    let approvals = sqlx::query_as::<_, ApprovalResponse>(
        r#"
        SELECT id, permit_id, approver_id, status, note, decided_at
        FROM permit_approvals
        WHERE permit_id = ?
        ORDER BY id
        "#,
    )
    .bind(permit_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to fetch approval records");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PermitDetailResponse { permit, approvals }))
}

/* =========================
Approver decision
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/permits/{permit_id}/approvals",
    params(("permit_id" = u64, Path, description = "Permit request ID")),
    request_body = ApprovalDecisionReq,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 400, description = "No pending approval assigned to the caller"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn decide_approval(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<ApprovalDecisionReq>,
) -> actix_web::Result<impl Responder> {
    let approver_id = auth.require_employee_profile()?;
    let permit_id = path.into_inner();

    // The join keeps decisions out of requests an administrator has already
    // resolved.
    let result = sqlx::query(
        r#"
        UPDATE permit_approvals pa
        JOIN permit_requests p ON p.id = pa.permit_id
        SET pa.status = ?, pa.note = ?, pa.decided_at = NOW()
        WHERE pa.permit_id = ?
          AND pa.approver_id = ?
          AND pa.status = 'pending'
          AND p.status = 'pending'
        "#,
    )
    .bind(body.decision.as_str())
    .bind(&body.note)
    .bind(permit_id)
    .bind(approver_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, approver_id, "Failed to record approval decision");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "No pending approval assigned to you on this permit"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Decision recorded",
        "decision": body.decision.as_str()
    })))
}

/* =========================
Final sign-off (Admin)
========================= */
/// The check and the write happen inside one transaction with the approval
/// rows locked, so two concurrent sessions cannot both finalize and a stale
/// read cannot slip past a pending or rejected sub-approval.
#[utoipa::path(
    put,
    path = "/api/v1/permits/{permit_id}/finalize",
    params(("permit_id" = u64, Path, description = "Permit request ID")),
    responses(
        (status = 200, description = "Permit approved and document generated"),
        (status = 400, description = "Permit not found or already processed"),
        (status = 409, description = "Consensus not reached"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn finalize_permit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let permit_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, permit_id, "Failed to open finalize transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let sql = format!(
        "SELECT {} FROM permit_requests WHERE id = ? AND status = 'pending' FOR UPDATE",
        PERMIT_COLUMNS
    );
    let permit = sqlx::query_as::<_, PermitResponse>(&sql)
        .bind(permit_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, permit_id, "Failed to lock permit row");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let permit = match permit {
        Some(p) => p,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Permit not found or already processed"
            })));
        }
    };

    let statuses = sqlx::query_as::<_, (String,)>(
        "SELECT status FROM permit_approvals WHERE permit_id = ? FOR UPDATE",
    )
    .bind(permit_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to lock approval records");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let statuses: Vec<ApprovalStatus> = statuses
        .iter()
        .map(|(s,)| {
            ApprovalStatus::parse(s)
                .ok_or_else(|| ErrorInternalServerError("Corrupt approval status"))
        })
        .collect::<Result<_, _>>()?;

    match approval::evaluate(&statuses) {
        Consensus::Ready => {}
        Consensus::AwaitingDecisions { pending } => {
            let _ = tx.rollback().await;
            return Ok(HttpResponse::Conflict().json(json!({
                "message": format!("{} approval(s) still pending", pending)
            })));
        }
        Consensus::Rejected { rejected } => {
            let _ = tx.rollback().await;
            return Ok(HttpResponse::Conflict().json(json!({
                "message": format!("{} approver(s) rejected this permit", rejected)
            })));
        }
    }

    let employee = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT first_name, last_name, employee_code, company FROM employees WHERE id = ?",
    )
    .bind(permit.employee_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to fetch employee for permit document");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee_name = format!("{} {}", employee.0, employee.1);
    let today = Utc::now().date_naive();

    let document = pdf::PermitDocument {
        employee_name: &employee_name,
        employee_code: &employee.2,
        company: &employee.3,
        permit_type: &permit.permit_type,
        start_date: permit.start_date,
        end_date: permit.end_date,
        start_time: permit.start_time,
        end_time: permit.end_time,
        justification: &permit.justification,
        approved_on: today,
    };

    let bytes = pdf::render_permit(&document).map_err(|e| {
        error!(error = %e, permit_id, "Failed to render permit document");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let file_name = pdf::store_document(&config.documents_dir, "permit", &bytes).map_err(|e| {
        error!(error = %e, permit_id, "Failed to store permit document");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        UPDATE permit_requests
        SET status = 'approved', document_path = ?, resolved_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(&file_name)
    .bind(permit_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to finalize permit");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        let _ = tx.rollback().await;
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Permit not found or already processed"
        })));
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, permit_id, "Failed to commit permit finalization");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Permit approved",
        "document_path": file_name
    })))
}

/* =========================
Reject permit (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/permits/{permit_id}/reject",
    params(("permit_id" = u64, Path, description = "Permit request ID")),
    responses(
        (status = 200, description = "Permit rejected"),
        (status = 400, description = "Permit not found or already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn reject_permit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let permit_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE permit_requests
        SET status = 'rejected', resolved_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(permit_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Reject permit failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Permit not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Permit rejected"
    })))
}

/* =========================
Document download
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/permits/{permit_id}/document",
    params(("permit_id" = u64, Path, description = "Permit request ID")),
    responses(
        (status = 200, description = "Generated permit PDF", content_type = "application/pdf"),
        (status = 404, description = "Permit or document not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Permit"
)]
pub async fn download_permit_document(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let permit_id = path.into_inner();

    let row = sqlx::query_as::<_, (u64, Option<String>)>(
        "SELECT employee_id, document_path FROM permit_requests WHERE id = ?",
    )
    .bind(permit_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to fetch permit document path");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let (employee_id, document_path) = match row {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Permit not found"
            })));
        }
    };

    if !can_view_permit(&auth, pool.get_ref(), permit_id, employee_id).await? {
        return Err(actix_web::error::ErrorForbidden("Not your request"));
    }

    match document_path {
        Some(file_name) => serve_pdf(&config.documents_dir, &file_name).await,
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No document generated for this permit"
        }))),
    }
}

/// Requester, HR staff, or an approver designated on this permit.
async fn can_view_permit(
    auth: &AuthUser,
    pool: &MySqlPool,
    permit_id: u64,
    owner_employee_id: u64,
) -> actix_web::Result<bool> {
    if auth.can_view_employee(owner_employee_id) {
        return Ok(true);
    }

    let approver_id = match auth.employee_id {
        Some(id) => id,
        None => return Ok(false),
    };

    let assigned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM permit_approvals WHERE permit_id = ? AND approver_id = ?)",
    )
    .bind(permit_id)
    .bind(approver_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        error!(error = %e, permit_id, "Failed to check approver assignment");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(assigned)
}

pub(crate) async fn serve_pdf(dir: &str, file_name: &str) -> actix_web::Result<HttpResponse> {
    let path = std::path::Path::new(dir).join(file_name);
    let disposition = format!("attachment; filename=\"{}\"", file_name);

    let bytes = web::block(move || std::fs::read(path))
        .await?
        .map_err(|e| {
            error!(error = %e, file_name = %file_name, "Failed to read document from disk");
            ErrorInternalServerError("Document unavailable")
        })?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(("Content-Disposition", disposition))
        .body(bytes))
}
