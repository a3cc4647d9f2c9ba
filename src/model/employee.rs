use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "Laura",
        "last_name": "Gomez",
        "email": "laura.gomez@company.com",
        "phone": "+573001234567",
        "company": "Acme Holdings",
        "site": "Bogota",
        "position": "Analyst",
        "health_provider": "Sura EPS",
        "pension_fund": "Porvenir",
        "monthly_salary": 3200000.0,
        "hire_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Laura")]
    pub first_name: String,

    #[schema(example = "Gomez")]
    pub last_name: String,

    #[schema(example = "laura.gomez@company.com")]
    pub email: String,

    #[schema(example = "+573001234567", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Acme Holdings")]
    pub company: String,

    #[schema(example = "Bogota")]
    pub site: String,

    #[schema(example = "Analyst")]
    pub position: String,

    /// Health benefits provider (EPS) the employee is affiliated with.
    #[schema(example = "Sura EPS", nullable = true)]
    pub health_provider: Option<String>,

    #[schema(example = "Porvenir", nullable = true)]
    pub pension_fund: Option<String>,

    #[schema(example = 3200000.0, nullable = true)]
    pub monthly_salary: Option<f64>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,

    #[schema(nullable = true)]
    pub termination_reason: Option<String>,

    #[schema(value_type = Option<String>, format = "date", nullable = true)]
    pub termination_date: Option<NaiveDate>,
}
