use crate::api::certification::{
    CertificationFilter, CertificationListResponse, CertificationResponse, CreateCertification,
};
use crate::api::comment::{CommentResponse, CreateComment, UnreadCount};
use crate::api::employee::{
    CreateEmployee, DeactivateEmployee, EmployeeListResponse, EmployeeQuery,
};
use crate::api::medical_leave::{
    CreateMedicalLeave, DecisionNote, MedicalLeaveFilter, MedicalLeaveListResponse,
    MedicalLeaveResponse,
};
use crate::api::permit::{
    ApprovalDecisionReq, ApprovalResponse, CreatePermit, Decision, PermitDetailResponse,
    PermitFilter, PermitListResponse, PermitResponse,
};
use crate::api::stats::{EmployeeStats, GroupCount, MonthCount, RequestStats};
use crate::model::approval::ApprovalStatus;
use crate::model::comment::RequestKind;
use crate::model::employee::Employee;
use crate::model::permit::PermitType;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## Human Resources Administration Portal

This API powers an HR administration portal: directory management, permit
workflows with multi-approver sign-off, medical leave approvals, labor
certification letters, dashboard statistics, and request comment threads.

### Key Features
- **Employee directory**: search, filter, paginate, CSV import/export,
  lifecycle deactivation with termination metadata
- **Permit workflow**: per-approver approval records; an administrator
  finalizes only once every designated approver has approved, generating the
  permit PDF
- **Medical leaves**: single-approver incapacity handling
- **Certifications**: labor certification letters rendered as PDF
- **Statistics**: headcount and request-volume breakdowns with shares
- **Comments**: per-request threads with unread badges

### Security
Endpoints under the API prefix require **JWT Bearer authentication**; HR and
administrator roles gate the sensitive operations.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::deactivate_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::import_employees,
        crate::api::employee::export_employees,

        crate::api::permit::create_permit,
        crate::api::permit::permit_list,
        crate::api::permit::assigned_permits,
        crate::api::permit::get_permit,
        crate::api::permit::decide_approval,
        crate::api::permit::finalize_permit,
        crate::api::permit::reject_permit,
        crate::api::permit::download_permit_document,

        crate::api::medical_leave::create_medical_leave,
        crate::api::medical_leave::medical_leave_list,
        crate::api::medical_leave::get_medical_leave,
        crate::api::medical_leave::approve_medical_leave,
        crate::api::medical_leave::reject_medical_leave,

        crate::api::certification::create_certification,
        crate::api::certification::certification_list,
        crate::api::certification::get_certification,
        crate::api::certification::issue_certification,
        crate::api::certification::reject_certification,
        crate::api::certification::download_certification_document,

        crate::api::stats::employee_stats,
        crate::api::stats::request_stats,

        crate::api::comment::list_comments,
        crate::api::comment::create_comment,
        crate::api::comment::mark_thread_seen,
        crate::api::comment::unread_counts,
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            DeactivateEmployee,

            PermitType,
            ApprovalStatus,
            CreatePermit,
            PermitResponse,
            PermitListResponse,
            PermitDetailResponse,
            PermitFilter,
            ApprovalResponse,
            ApprovalDecisionReq,
            Decision,

            CreateMedicalLeave,
            MedicalLeaveResponse,
            MedicalLeaveListResponse,
            MedicalLeaveFilter,
            DecisionNote,

            CreateCertification,
            CertificationResponse,
            CertificationListResponse,
            CertificationFilter,

            EmployeeStats,
            RequestStats,
            GroupCount,
            MonthCount,

            RequestKind,
            CreateComment,
            CommentResponse,
            UnreadCount,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Permit", description = "Permit request workflow APIs"),
        (name = "MedicalLeave", description = "Medical leave (incapacity) APIs"),
        (name = "Certification", description = "Labor certification APIs"),
        (name = "Stats", description = "Dashboard statistics APIs"),
        (name = "Comments", description = "Request comment thread APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
