use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod db;
pub mod error;
pub mod evidence;
pub mod generation;
pub mod incident;
pub mod metrics;
pub mod organization;
pub mod ratelimit;
pub mod storage;

pub use crate::db::AppState;
pub use crate::error::{ApiError, ErrorBody};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::generation::handlers::generate_document,
        crate::generation::handlers::list_document_types,
        crate::organization::handlers::get_organization,
        crate::evidence::handlers::list_evidence,
        crate::evidence::handlers::upload_evidence,
        crate::evidence::handlers::get_evidence,
        crate::evidence::handlers::update_evidence,
        crate::evidence::handlers::attest_evidence,
        crate::evidence::handlers::delete_evidence,
        crate::evidence::handlers::evidence_by_document,
        crate::evidence::handlers::search_evidence,
        crate::incident::handlers::list_incidents,
        crate::incident::handlers::create_incident,
        crate::incident::handlers::update_incident,
        crate::incident::handlers::generate_notification_letter
    ),
    components(
        schemas(
            generation::handlers::GenerateDocumentRequest,
            generation::handlers::GenerateDocumentResponse,
            generation::DocumentType,
            generation::RemediationAction,
            generation::normalizer::EvidenceBundle,
            generation::normalizer::EvidenceFileDescriptor,
            organization::model::OrganizationData,
            evidence::model::EvidenceRecord,
            evidence::model::EvidenceView,
            evidence::model::EvidenceStatus,
            evidence::model::UpdateEvidenceRequest,
            evidence::model::AttestEvidenceRequest,
            evidence::handlers::EvidenceFilterQuery,
            incident::model::IncidentRecord,
            incident::model::CreateIncidentRequest,
            incident::model::UpdateIncidentRequest,
            incident::model::BreachNotificationRecord,
            incident::model::NotificationLetterResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Document Generation", description = "Policy document generation pipeline."),
        (name = "Organization", description = "Organization profile."),
        (name = "Evidence", description = "Compliance evidence records and files."),
        (name = "Incidents", description = "Incident log and breach notification letters.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
struct ApiDoc;

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_state = match AppState::new().await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to initialize application state. Check DATABASE_URL and the Supabase \
                 settings in .env and ensure the database is reachable. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };
    let rate_limiter = web::Data::new(ratelimit::RateLimiter::default());

    let prometheus = PrometheusMetricsBuilder::new("hipaa_compliance_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");
    metrics::register(&prometheus.registry).expect("Failed to register application metrics");

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let rate_limiter = rate_limiter.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .app_data(rate_limiter)
            .service(
                web::scope("/api")
                    .configure(organization::handlers::config)
                    .configure(generation::handlers::config)
                    .configure(evidence::handlers::config)
                    .configure(incident::handlers::config),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
