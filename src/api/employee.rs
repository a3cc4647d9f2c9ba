use crate::{
    auth::auth::AuthUser,
    model::employee::Employee,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-3000")]
    pub employee_code: String,
    #[schema(example = "Laura")]
    pub first_name: String,
    #[schema(example = "Gomez")]
    pub last_name: String,
    #[schema(example = "laura.gomez@company.com", format = "email")]
    pub email: String,
    #[schema(example = "+573001234567")]
    pub phone: Option<String>,
    #[schema(example = "Acme Holdings")]
    pub company: String,
    #[schema(example = "Bogota")]
    pub site: String,
    #[schema(example = "Analyst")]
    pub position: String,
    #[schema(example = "Sura EPS")]
    pub health_provider: Option<String>,
    #[schema(example = "Porvenir")]
    pub pension_fund: Option<String>,
    #[schema(example = 3200000.0)]
    pub monthly_salary: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Pagination page number (1-based)
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by lifecycle status: active / inactive
    pub status: Option<String>,
    pub company: Option<String>,
    pub site: Option<String>,
    /// Search by name, code or email
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 134)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct DeactivateEmployee {
    #[schema(example = "Contract ended")]
    pub termination_reason: String,
    #[schema(example = "2026-02-28", format = "date", value_type = String)]
    pub termination_date: Option<NaiveDate>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
}

/// One row of the import/export spreadsheet. Header names double as the CSV
/// column names.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CsvEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: String,
    pub site: String,
    pub position: String,
    pub health_provider: Option<String>,
    pub pension_fund: Option<String>,
    pub monthly_salary: Option<f64>,
    pub hire_date: NaiveDate,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created"),
        (status = 409, description = "Employee code or email already exists"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, phone, company, site, position,
         health_provider, pension_fund, monthly_salary, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(payload.email.trim().to_lowercase())
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(&payload.site)
    .bind(&payload.position)
    .bind(&payload.health_provider)
    .bind(&payload.pension_fund)
    .bind(payload.monthly_salary)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Employee code or email already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status.clone()));
    }

    if let Some(company) = &query.company {
        conditions.push("company = ?");
        bindings.push(FilterValue::Str(company.clone()));
    }

    if let Some(site) = &query.site {
        conditions.push("site = ?");
        bindings.push(FilterValue::Str(site.clone()));
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ? OR employee_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::Str(s) => count_query.bind(s),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::Str(s) => data_query.bind(s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if !auth.can_view_employee(employee_id) {
        return Err(actix_web::error::ErrorForbidden("Not your record"));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Update Employee (sparse payload: only provided fields are written)
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated successfully"),
        (status = 404, description = "Employee not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();

    let update = build_update_sql("employees", &body, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Deactivate: the directory never deletes on termination, it flips the
/// lifecycle state and records why.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}/deactivate",
    params(("employee_id", Path, description = "Employee ID")),
    request_body = DeactivateEmployee,
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 400, description = "Employee not found or already inactive"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn deactivate_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<DeactivateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let termination_date = body
        .termination_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let result = sqlx::query(
        r#"
        UPDATE employees
        SET status = 'inactive', termination_reason = ?, termination_date = ?
        WHERE id = ? AND status = 'active'
        "#,
    )
    .bind(&body.termination_reason)
    .bind(termination_date)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to deactivate employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee not found or already inactive"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deactivated"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Bulk import: request body is the CSV file itself. The whole file is applied
/// in one transaction; the first bad row aborts the import.
#[utoipa::path(
    post,
    path = "/api/v1/employees/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Rows imported"),
        (status = 400, description = "Malformed CSV row"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn import_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let rows = parse_employee_csv(&body).map_err(actix_web::error::ErrorBadRequest)?;

    if rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "CSV contained no rows"
        })));
    }

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open import transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    for (i, row) in rows.iter().enumerate() {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (employee_code, first_name, last_name, email, phone, company, site, position,
             health_provider, pension_fund, monthly_salary, hire_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.employee_code)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(row.email.trim().to_lowercase())
        .bind(&row.phone)
        .bind(&row.company)
        .bind(&row.site)
        .bind(&row.position)
        .bind(&row.health_provider)
        .bind(&row.pension_fund)
        .bind(row.monthly_salary)
        .bind(row.hire_date)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            let _ = tx.rollback().await;

            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": format!("Row {}: duplicate employee code or email", i + 1)
                    })));
                }
            }

            error!(error = %e, row = i + 1, "Employee import failed");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit employee import");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Import complete",
        "imported": rows.len()
    })))
}

/// Export the full directory as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/employees/export",
    responses(
        (status = 200, description = "CSV download", content_type = "text/csv"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn export_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let rows = sqlx::query_as::<_, CsvEmployee>(
        r#"
        SELECT employee_code, first_name, last_name, email, phone, company, site,
               position, health_provider, pension_fund, monthly_salary, hire_date
        FROM employees
        ORDER BY employee_code
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees for export");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer
            .serialize(row)
            .map_err(actix_web::error::ErrorInternalServerError)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"employees.csv\"",
        ))
        .body(bytes))
}

fn parse_employee_csv(bytes: &[u8]) -> Result<Vec<CsvEmployee>, String> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();

    for (i, record) in reader.deserialize::<CsvEmployee>().enumerate() {
        let row = record.map_err(|e| format!("Row {}: {}", i + 1, e))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "employee_code,first_name,last_name,email,phone,company,site,position,health_provider,pension_fund,monthly_salary,hire_date";

    #[test]
    fn parses_well_formed_csv() {
        let csv = format!(
            "{}\nEMP-001,Laura,Gomez,laura@acme.com,+5730012,Acme,Bogota,Analyst,Sura,Porvenir,3200000,2024-01-01\n",
            HEADER
        );
        let rows = parse_employee_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_code, "EMP-001");
        assert_eq!(rows[0].monthly_salary, Some(3_200_000.0));
        assert_eq!(rows[0].hire_date.to_string(), "2024-01-01");
    }

    #[test]
    fn empty_optional_columns_become_none() {
        let csv = format!(
            "{}\nEMP-002,Juan,Perez,juan@acme.com,,Acme,Cali,Driver,,,,2023-05-10\n",
            HEADER
        );
        let rows = parse_employee_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].phone, None);
        assert_eq!(rows[0].health_provider, None);
        assert_eq!(rows[0].monthly_salary, None);
    }

    #[test]
    fn bad_date_reports_row_number() {
        let csv = format!(
            "{}\nEMP-003,Ana,Ruiz,ana@acme.com,,Acme,Cali,Clerk,,,,not-a-date\n",
            HEADER
        );
        let err = parse_employee_csv(csv.as_bytes()).unwrap_err();
        assert!(err.starts_with("Row 1:"));
    }
}
