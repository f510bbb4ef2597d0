//! # Car Core
//!
//! 차량 레지스트리의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 API 서버 전반에서 사용되는 기본 타입을 제공합니다:
//! - 차량, 차량 이력, 평점 도메인 모델
//! - 목록 조회용 페이지 스펙 (page/limit/sort/filter 정규화)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod page;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use page::*;
