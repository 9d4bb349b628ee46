pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me));

    let student_routes = Router::new()
        .route("/", get(routes::student::list).post(routes::student::create))
        .route("/{student_id}", get(routes::student::get))
        .route("/{student_id}", put(routes::student::update))
        .route("/{student_id}", delete(routes::student::delete))
        .route("/{student_id}/performance", get(routes::student::performance));

    let teacher_routes = Router::new()
        .route("/", get(routes::teacher::list).post(routes::teacher::create))
        .route("/{teacher_id}", get(routes::teacher::get))
        .route("/{teacher_id}", put(routes::teacher::update))
        .route("/{teacher_id}", delete(routes::teacher::delete));

    let grade_routes = Router::new()
        .route("/", get(routes::grade::list).post(routes::grade::create));

    let class_routes = Router::new()
        .route("/", get(routes::school_class::list).post(routes::school_class::create));

    let subject_routes = Router::new()
        .route("/", get(routes::subject::list).post(routes::subject::create));

    let attendance_routes = Router::new()
        .route(
            "/",
            get(routes::attendance::list).post(routes::attendance::save_day_sheet),
        )
        .route("/analytics", get(routes::attendance::analytics));

    let exam_routes = Router::new()
        .route("/", get(routes::exam::list).post(routes::exam::create))
        .route("/{exam_id}", get(routes::exam::get))
        .route("/{exam_id}/result", post(routes::exam::save_results))
        .route("/{exam_id}/complete", post(routes::exam::complete))
        .route("/{exam_id}/publish", post(routes::exam::publish))
        .route("/{exam_id}/results", get(routes::exam::results));

    let fee_routes = Router::new()
        .route("/", get(routes::fee::list).post(routes::fee::create))
        .route("/analytics", get(routes::fee::analytics))
        .route("/{payment_id}/pay", post(routes::fee::pay));

    let event_routes = Router::new()
        .route("/", get(routes::event::list).post(routes::event::create));

    let notification_routes = Router::new()
        .route(
            "/",
            get(routes::notification::list_mine).post(routes::notification::create),
        )
        .route("/unread", get(routes::notification::unread_count))
        .route("/{notification_id}/read", post(routes::notification::mark_read));

    let conversation_routes = Router::new()
        .route(
            "/",
            get(routes::conversation::list).post(routes::conversation::start),
        )
        .route(
            "/{conversation_id}/message",
            get(routes::conversation::list_messages).post(routes::conversation::send_message),
        )
        .route("/{conversation_id}/read", post(routes::conversation::mark_read));

    let analytics_routes = Router::new()
        .route("/overview", get(routes::analytics::overview))
        .route("/attendance", get(routes::analytics::attendance))
        .route("/performance", get(routes::analytics::performance))
        .route("/fees", get(routes::analytics::fees))
        .route("/enrollment", get(routes::analytics::enrollment));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/student", student_routes)
        .nest("/teacher", teacher_routes)
        .nest("/grade", grade_routes)
        .nest("/class", class_routes)
        .nest("/subject", subject_routes)
        .nest("/attendance", attendance_routes)
        .nest("/exam", exam_routes)
        .nest("/fee", fee_routes)
        .nest("/event", event_routes)
        .nest("/notification", notification_routes)
        .nest("/conversation", conversation_routes)
        .nest("/analytics", analytics_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
