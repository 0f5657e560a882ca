//! 대시보드 도메인 타입.
//!
//! - [`content`]: 일일 콘텐츠 캐시 키
//! - [`preferences`]: 사용자 선호 태그와 톤 결정

pub mod content;
pub mod preferences;

pub use content::*;
pub use preferences::*;
