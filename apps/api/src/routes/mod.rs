pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::ai::handlers as ai;
use crate::applications::handlers as applications;
use crate::auth::{handlers as auth, require_auth};
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::latex::handlers as latex;
use crate::resume::handlers as resume;
use crate::resume::upload::{UPLOADS_ROUTE, UPLOAD_BODY_LIMIT};
use crate::saved_jobs::handlers as saved_jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/jobs", get(jobs::handle_list_jobs))
        .route("/api/jobs/featured", get(jobs::handle_featured_jobs))
        .route("/api/jobs/:id", get(jobs::handle_get_job))
        .route("/api/companies", get(companies::handle_list_companies))
        .route("/api/companies/:id", get(companies::handle_get_company))
        .route("/api/search", get(jobs::handle_search))
        .route("/api/stats", get(jobs::handle_stats));

    let protected = Router::new()
        .route(
            "/api/auth/me",
            get(auth::handle_me).patch(auth::handle_update_me),
        )
        // Jobs
        .route("/api/jobs", post(jobs::handle_create_job))
        .route("/api/jobs/:id", patch(jobs::handle_update_job))
        .route(
            "/api/jobs/:id/applications",
            get(jobs::handle_job_applications),
        )
        .route("/api/companies", post(companies::handle_create_company))
        // Applications
        .route(
            "/api/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Saved jobs
        .route(
            "/api/saved-jobs",
            get(saved_jobs::handle_list_saved).post(saved_jobs::handle_save_job),
        )
        .route(
            "/api/saved-jobs/:job_id",
            delete(saved_jobs::handle_unsave_job),
        )
        // Resume
        .route(
            "/api/resume/upload",
            post(resume::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/resume/analyze", post(resume::handle_analyze))
        .route("/api/resume/analyses", get(resume::handle_list_analyses))
        // AI
        .route("/api/ai/job-match", post(ai::handle_job_match))
        .route("/api/ai/cover-letter", post(ai::handle_cover_letter))
        // LaTeX templates
        .route(
            "/api/latex-templates",
            get(latex::handle_list_templates).post(latex::handle_create_template),
        )
        .route("/api/latex-templates/generate", post(latex::handle_generate))
        .route("/api/latex-templates/enhance", post(latex::handle_enhance))
        .route(
            "/api/latex-templates/:id",
            get(latex::handle_get_template)
                .put(latex::handle_update_template)
                .delete(latex::handle_delete_template),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let uploads = ServeDir::new(&state.config.upload_dir);

    public
        .merge(protected)
        .nest_service(UPLOADS_ROUTE, uploads)
        .with_state(state)
}
