//! HTTP 요청 metrics middleware.
//!
//! 라우트 템플릿(`/api/cars/{id}`) 단위로 요청 수, 응답 상태, 처리 시간을 기록합니다.
//! 매칭되지 않은 요청은 숫자 세그먼트를 정규화한 경로로 기록합니다.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 스크레이프 요청은 기록하지 않음.
const METRICS_PATH: &str = "/metrics";

/// 메트릭 라벨로 쓸 경로.
fn route_label(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    }
}

/// HTTP 메트릭을 수집하는 미들웨어.
///
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    if request.uri().path() == METRICS_PATH {
        return next.run(request).await;
    }

    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let path = route_label(&request);
    record_http_request(&method, &path);

    let response = next.run(request).await;

    record_http_response(&method, &path, response.status().as_u16());
    record_http_duration(&method, &path, started.elapsed().as_secs_f64());
    response
}
