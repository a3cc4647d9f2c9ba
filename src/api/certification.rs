use crate::{auth::auth::AuthUser, config::Config, pdf};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{prelude::FromRow, MySqlPool};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateCertification {
    /// Who the letter is addressed to; defaults to "To whom it may concern"
    #[schema(example = "Banco Central")]
    pub addressee: Option<String>,
    /// Whether the letter should state the monthly salary
    #[schema(example = true)]
    pub include_salary: bool,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct CertificationResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(nullable = true)]
    pub addressee: Option<String>,
    pub include_salary: bool,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub document_path: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub issued_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CertificationFilter {
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct CertificationListResponse {
    pub data: Vec<CertificationResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Employment attributes printed on the letter.
#[derive(FromRow)]
struct CertifiedEmployee {
    first_name: String,
    last_name: String,
    employee_code: String,
    company: String,
    position: String,
    hire_date: NaiveDate,
    monthly_salary: Option<f64>,
}

/* =========================
Request a certification
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/certifications",
    request_body = CreateCertification,
    responses(
        (status = 201, description = "Certification requested"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn create_certification(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCertification>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    let result = sqlx::query(
        r#"
        INSERT INTO certifications (employee_id, addressee, include_salary)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(&payload.addressee)
    .bind(payload.include_salary)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create certification request");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Certification requested",
        "id": result.last_insert_id(),
        "status": "pending"
    })))
}

/* =========================
List certifications
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/certifications",
    params(CertificationFilter),
    responses(
        (status = 200, description = "Paginated certification list", body = CertificationListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn certification_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CertificationFilter>,
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

    let count_sql = format!("SELECT COUNT(*) FROM certifications{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count certifications");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_id, addressee, include_salary, status, document_path,
               issued_at, created_at
        FROM certifications
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, CertificationResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let certifications = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch certification list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(CertificationListResponse {
        data: certifications,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Get one certification
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/certifications/{certification_id}",
    params(("certification_id" = u64, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification found", body = CertificationResponse),
        (status = 404, description = "Certification not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn get_certification(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let certification_id = path.into_inner();

    let certification = sqlx::query_as::<_, CertificationResponse>(
        r#"
        SELECT id, employee_id, addressee, include_salary, status, document_path,
               issued_at, created_at
        FROM certifications
        WHERE id = ?
        "#,
    )
    .bind(certification_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Failed to fetch certification");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match certification {
        Some(data) => {
            if !auth.can_view_employee(data.employee_id) {
                return Err(actix_web::error::ErrorForbidden("Not your request"));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Certification not found"
        }))),
    }
}

/* =========================
Issue (HR or Admin): generates the letter
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/certifications/{certification_id}/issue",
    params(("certification_id" = u64, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification issued and document generated"),
        (status = 400, description = "Certification not found or already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn issue_certification(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let certification_id = path.into_inner();

    let row = sqlx::query_as::<_, (u64, Option<String>, bool, String)>(
        "SELECT employee_id, addressee, include_salary, status FROM certifications WHERE id = ?",
    )
    .bind(certification_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Failed to fetch certification");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let (employee_id, addressee, include_salary, status) = match row {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Certification not found or already processed"
            })));
        }
    };

    if status != "pending" {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Certification not found or already processed"
        })));
    }

    let employee = sqlx::query_as::<_, CertifiedEmployee>(
        r#"
        SELECT first_name, last_name, employee_code, company, position, hire_date, monthly_salary
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Failed to fetch employee for certification");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee_name = format!("{} {}", employee.first_name, employee.last_name);

    let document = pdf::CertificationDocument {
        employee_name: &employee_name,
        employee_code: &employee.employee_code,
        company: &employee.company,
        position: &employee.position,
        hire_date: employee.hire_date,
        monthly_salary: if include_salary {
            employee.monthly_salary
        } else {
            None
        },
        addressee: addressee.as_deref(),
        issued_on: Utc::now().date_naive(),
    };

    let bytes = pdf::render_certification(&document).map_err(|e| {
        error!(error = %e, certification_id, "Failed to render certification document");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let file_name =
        pdf::store_document(&config.documents_dir, "certification", &bytes).map_err(|e| {
            error!(error = %e, certification_id, "Failed to store certification document");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let result = sqlx::query(
        r#"
        UPDATE certifications
        SET status = 'issued', document_path = ?, issued_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(&file_name)
    .bind(certification_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Failed to mark certification issued");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        // Another session won the conditional update; drop the orphan file.
        let _ = std::fs::remove_file(std::path::Path::new(&config.documents_dir).join(&file_name));
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Certification not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Certification issued",
        "document_path": file_name
    })))
}

/* =========================
Reject (HR or Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/certifications/{certification_id}/reject",
    params(("certification_id" = u64, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification rejected"),
        (status = 400, description = "Certification not found or already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn reject_certification(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let certification_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE certifications
        SET status = 'rejected'
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(certification_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Reject certification failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Certification not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Certification rejected"
    })))
}

/* =========================
Document download
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/certifications/{certification_id}/document",
    params(("certification_id" = u64, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Issued certification PDF", content_type = "application/pdf"),
        (status = 404, description = "Certification or document not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Certification"
)]
pub async fn download_certification_document(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let certification_id = path.into_inner();

    let row = sqlx::query_as::<_, (u64, Option<String>)>(
        "SELECT employee_id, document_path FROM certifications WHERE id = ?",
    )
    .bind(certification_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, certification_id, "Failed to fetch certification document path");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let (employee_id, document_path) = match row {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Certification not found"
            })));
        }
    };

    if !auth.can_view_employee(employee_id) {
        return Err(actix_web::error::ErrorForbidden("Not your request"));
    }

    match document_path {
        Some(file_name) => super::permit::serve_pdf(&config.documents_dir, &file_name).await,
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No document issued for this certification"
        }))),
    }
}
