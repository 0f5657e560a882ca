//! 코어 오류 타입.

use thiserror::Error;

/// 설정 및 부트스트랩 단계에서 발생하는 오류.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 로드/역직렬화 실패
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// 로깅 초기화 실패
    #[error("Logging initialization failed: {0}")]
    Logging(String),

    /// 잘못된 입력 값
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
