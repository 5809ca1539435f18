//! Sweet Shop API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 회원 가입/로그인, 상품 카탈로그, 재고 관리 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use sweetshop_api::openapi::swagger_ui_router;
use sweetshop_api::routes::create_api_router;
use sweetshop_api::state::AppState;
use sweetshop_core::{init_logging_from_env, AppConfig};

/// 환경 변수에서 애플리케이션 설정 로드.
///
/// # 환경변수
///
/// - `API_HOST`: 바인딩 호스트 (기본값: 127.0.0.1)
/// - `API_PORT`: 바인딩 포트 (기본값: 3000)
/// - `DB_MAX_CONNECTIONS`: 커넥션 풀 크기 (기본값: 10)
/// - `JWT_SECRET`: 토큰 서명 비밀 키 (미설정 시 개발용 기본값 + 경고)
/// - `JWT_EXPIRES_MINUTES`: 토큰 만료 시간(분) (기본값: 60)
/// - `CATALOG_PUBLIC`: 목록/검색 공개 여부 (기본값: true)
fn load_config() -> AppConfig {
    let mut config = AppConfig::default();

    if let Ok(host) = std::env::var("API_HOST") {
        config.server.host = host;
    }
    if let Some(port) = std::env::var("API_PORT").ok().and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(max) = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.database.max_connections = max;
    }

    match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => config.auth.jwt_secret = secret,
        _ => {
            warn!("JWT_SECRET not set, using default (INSECURE for development only)");
        }
    }
    if let Some(minutes) = std::env::var("JWT_EXPIRES_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.auth.token_expires_minutes = minutes;
    }

    if let Ok(value) = std::env::var("CATALOG_PUBLIC") {
        config.catalog.public_read = !(value == "false" || value == "0");
    }

    config
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://shop.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 자격 증명 포함 허용 (CORS_ORIGINS 설정 시에만)
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // tracing 초기화
    init_logging_from_env()?;

    info!("Starting Sweet Shop API server...");

    // 설정 로드
    let config = load_config();
    let addr: SocketAddr = config.server.addr().parse().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // 데이터베이스 연결 (필수, 실패 시 즉시 종료)
    let database_url = std::env::var("DATABASE_URL").map_err(|e| {
        error!("DATABASE_URL not set. 데이터베이스 연결 주소가 필요합니다.");
        e
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&database_url)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to connect to database");
            e
        })?;

    info!("Connected to PostgreSQL successfully");

    // 스키마 마이그레이션 (실패 시 즉시 종료)
    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Database migrations applied");

    // AppState 생성
    let state = Arc::new(AppState::new(pool, config));
    info!(
        version = %state.version,
        catalog_public = state.config.catalog.public_read,
        "Application state initialized"
    );

    // 라우터 생성
    let app = create_router(state);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown 처리
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 서버 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
