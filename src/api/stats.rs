use crate::auth::auth::AuthUser;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

/// One slice of a breakdown chart: absolute count plus its percentage share,
/// rounded to one decimal.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct GroupCount {
    #[schema(example = "Bogota")]
    pub label: String,
    #[schema(example = 42)]
    pub count: i64,
    #[schema(example = 35.6)]
    pub share: f64,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct MonthCount {
    #[schema(example = "2026-02")]
    pub month: String,
    #[schema(example = 7)]
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub by_company: Vec<GroupCount>,
    pub by_site: Vec<GroupCount>,
}

#[derive(Serialize, ToSchema)]
pub struct RequestStats {
    pub permits_by_status: Vec<GroupCount>,
    pub permits_by_type: Vec<GroupCount>,
    pub medical_leaves_by_status: Vec<GroupCount>,
    pub certifications_by_status: Vec<GroupCount>,
    /// Permit submissions per month, oldest first, zero-filled
    pub permits_monthly: Vec<MonthCount>,
}

const MONTHS_BACK: usize = 12;

fn share_of(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 1000.0).round() / 10.0
}

/// Attach percentage shares to a grouped count. The total is the sum of the
/// groups themselves, so shares always describe the same population the chart
/// shows.
fn with_shares(rows: Vec<(String, i64)>) -> Vec<GroupCount> {
    let total: i64 = rows.iter().map(|(_, c)| *c).sum();
    rows.into_iter()
        .map(|(label, count)| GroupCount {
            label,
            count,
            share: share_of(count, total),
        })
        .collect()
}

/// "YYYY-MM" labels for the `n` months ending at `latest`, oldest first.
fn month_labels(latest: NaiveDate, n: usize) -> Vec<String> {
    let mut year = latest.year();
    let mut month = latest.month() as i32;

    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        labels.push(format!("{:04}-{:02}", year, month));
        month -= 1;
        if month == 0 {
            month = 12;
            year -= 1;
        }
    }
    labels.reverse();
    labels
}

/// Months with no submissions still have to appear on the chart.
fn zero_fill(labels: Vec<String>, rows: &[(String, i64)]) -> Vec<MonthCount> {
    labels
        .into_iter()
        .map(|month| {
            let count = rows
                .iter()
                .find(|(m, _)| *m == month)
                .map(|(_, c)| *c)
                .unwrap_or(0);
            MonthCount { month, count }
        })
        .collect()
}

async fn group_by(
    pool: &MySqlPool,
    sql: &str,
) -> actix_web::Result<Vec<(String, i64)>> {
    sqlx::query_as::<_, (String, i64)>(sql)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!(error = %e, sql, "Stats group query failed");
            ErrorInternalServerError("Internal Server Error")
        })
}

/* =========================
Headcount dashboard
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/stats/employees",
    responses(
        (status = 200, description = "Headcount breakdowns", body = EmployeeStats),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn employee_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let by_status = group_by(
        pool.get_ref(),
        "SELECT status, COUNT(*) FROM employees GROUP BY status",
    )
    .await?;

    let total: i64 = by_status.iter().map(|(_, c)| *c).sum();
    let count_for = |status: &str| {
        by_status
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    };

    let by_company = group_by(
        pool.get_ref(),
        "SELECT company, COUNT(*) FROM employees GROUP BY company ORDER BY COUNT(*) DESC",
    )
    .await?;

    let by_site = group_by(
        pool.get_ref(),
        "SELECT site, COUNT(*) FROM employees GROUP BY site ORDER BY COUNT(*) DESC",
    )
    .await?;

    Ok(HttpResponse::Ok().json(EmployeeStats {
        total,
        active: count_for("active"),
        inactive: count_for("inactive"),
        by_company: with_shares(by_company),
        by_site: with_shares(by_site),
    }))
}

/* =========================
Request volume dashboard
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/stats/requests",
    responses(
        (status = 200, description = "Request volume breakdowns", body = RequestStats),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn request_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let permits_by_status = group_by(
        pool.get_ref(),
        "SELECT status, COUNT(*) FROM permit_requests GROUP BY status",
    )
    .await?;

    let permits_by_type = group_by(
        pool.get_ref(),
        "SELECT permit_type, COUNT(*) FROM permit_requests GROUP BY permit_type",
    )
    .await?;

    let medical_by_status = group_by(
        pool.get_ref(),
        "SELECT status, COUNT(*) FROM medical_leaves GROUP BY status",
    )
    .await?;

    let certifications_by_status = group_by(
        pool.get_ref(),
        "SELECT status, COUNT(*) FROM certifications GROUP BY status",
    )
    .await?;

    let monthly_rows = group_by(
        pool.get_ref(),
        r#"
        SELECT DATE_FORMAT(created_at, '%Y-%m'), COUNT(*)
        FROM permit_requests
        WHERE created_at >= DATE_SUB(NOW(), INTERVAL 12 MONTH)
        GROUP BY DATE_FORMAT(created_at, '%Y-%m')
        "#,
    )
    .await?;

    let labels = month_labels(Utc::now().date_naive(), MONTHS_BACK);

    Ok(HttpResponse::Ok().json(RequestStats {
        permits_by_status: with_shares(permits_by_status),
        permits_by_type: with_shares(permits_by_type),
        medical_leaves_by_status: with_shares(medical_by_status),
        certifications_by_status: with_shares(certifications_by_status),
        permits_monthly: zero_fill(labels, &monthly_rows),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_roughly_one_hundred() {
        let groups = with_shares(vec![
            ("pending".into(), 1),
            ("approved".into(), 1),
            ("rejected".into(), 1),
        ]);
        let sum: f64 = groups.iter().map(|g| g.share).sum();
        assert!((sum - 100.0).abs() < 0.2);
    }

    #[test]
    fn share_rounds_to_one_decimal() {
        assert_eq!(share_of(1, 3), 33.3);
        assert_eq!(share_of(2, 3), 66.7);
        assert_eq!(share_of(5, 5), 100.0);
    }

    #[test]
    fn empty_population_has_zero_shares() {
        assert_eq!(share_of(0, 0), 0.0);
        assert!(with_shares(vec![]).is_empty());
    }

    #[test]
    fn month_labels_wrap_the_year_boundary() {
        let labels = month_labels(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(), 4);
        assert_eq!(labels, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
    }

    #[test]
    fn zero_fill_keeps_missing_months() {
        let labels = vec!["2026-01".to_string(), "2026-02".to_string()];
        let rows = vec![("2026-02".to_string(), 4)];

        let filled = zero_fill(labels, &rows);
        assert_eq!(
            filled,
            vec![
                MonthCount { month: "2026-01".into(), count: 0 },
                MonthCount { month: "2026-02".into(), count: 4 },
            ]
        );
    }
}
