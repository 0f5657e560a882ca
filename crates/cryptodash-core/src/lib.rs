//! # CryptoDash Core
//!
//! 크립토 대시보드의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 다른 크레이트에서 공통으로 사용하는 기반 타입을 제공합니다:
//! - 일일 콘텐츠 캐시 키 (콘텐츠 유형 + UTC 날짜)
//! - 사용자 선호 태그 및 톤 결정
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use crate::config::{
    AppConfig, ContentConfig, CorsConfig, DatabaseConfig, JwtConfig, LoggingConfig,
    ProvidersConfig, ServerConfig,
};
pub use domain::*;
pub use error::*;
pub use logging::*;
