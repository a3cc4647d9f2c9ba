use crate::{
    api::{certification, comment, employee, medical_leave, permit, stats},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(handlers::me)
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // fixed segments must register before /{id}
                    .service(
                        web::resource("/import")
                            .route(web::post().to(employee::import_employees)),
                    )
                    .service(
                        web::resource("/export")
                            .route(web::get().to(employee::export_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(employee::deactivate_employee)),
                    ),
            )
            .service(
                web::scope("/permits")
                    .service(
                        web::resource("")
                            .route(web::get().to(permit::permit_list))
                            .route(web::post().to(permit::create_permit)),
                    )
                    .service(
                        web::resource("/assigned")
                            .route(web::get().to(permit::assigned_permits)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(permit::get_permit)))
                    .service(
                        web::resource("/{id}/approvals")
                            .route(web::put().to(permit::decide_approval)),
                    )
                    .service(
                        web::resource("/{id}/finalize")
                            .route(web::put().to(permit::finalize_permit)),
                    )
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(permit::reject_permit)),
                    )
                    .service(
                        web::resource("/{id}/document")
                            .route(web::get().to(permit::download_permit_document)),
                    ),
            )
            .service(
                web::scope("/medical-leaves")
                    .service(
                        web::resource("")
                            .route(web::get().to(medical_leave::medical_leave_list))
                            .route(web::post().to(medical_leave::create_medical_leave)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(medical_leave::get_medical_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(medical_leave::approve_medical_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(medical_leave::reject_medical_leave)),
                    ),
            )
            .service(
                web::scope("/certifications")
                    .service(
                        web::resource("")
                            .route(web::get().to(certification::certification_list))
                            .route(web::post().to(certification::create_certification)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(certification::get_certification)),
                    )
                    .service(
                        web::resource("/{id}/issue")
                            .route(web::put().to(certification::issue_certification)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(certification::reject_certification)),
                    )
                    .service(
                        web::resource("/{id}/document")
                            .route(web::get().to(certification::download_certification_document)),
                    ),
            )
            .service(
                web::scope("/stats")
                    .service(
                        web::resource("/employees").route(web::get().to(stats::employee_stats)),
                    )
                    .service(web::resource("/requests").route(web::get().to(stats::request_stats))),
            )
            .service(
                web::scope("/comments")
                    .service(
                        web::resource("/unread").route(web::get().to(comment::unread_counts)),
                    )
                    .service(
                        web::resource("/{kind}/{request_id}")
                            .route(web::get().to(comment::list_comments))
                            .route(web::post().to(comment::create_comment)),
                    )
                    .service(
                        web::resource("/{kind}/{request_id}/seen")
                            .route(web::put().to(comment::mark_thread_seen)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
