//! JWT 토큰 처리.
//!
//! HS256 서명, 발급자(iss)와 대상(aud) 검증. 토큰 유효 기간은 설정의
//! `jwt.expires_in_days` (기본 7일).

use std::sync::Arc;

use chrono::{Duration, Utc};
use cryptodash_core::JwtConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 이메일
    pub email: String,
    /// 표시 이름
    pub name: String,
    /// 발급자
    pub iss: String,
    /// 대상
    pub aud: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

impl Claims {
    /// 숫자 사용자 ID. `sub`가 숫자가 아니면 `None`.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰")]
    InvalidToken,
}

struct KeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
}

/// 토큰 서명/검증 키.
///
/// 시작 시 한 번 생성되어 상태에 보관됩니다. 복제 비용은 `Arc` 하나입니다.
#[derive(Clone)]
pub struct JwtKeys {
    inner: Arc<KeysInner>,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("issuer", &self.inner.issuer)
            .field("audience", &self.inner.audience)
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(
        secret: &SecretString,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);
        validation.validate_exp = true;

        Self {
            inner: Arc::new(KeysInner {
                encoding: EncodingKey::from_secret(bytes),
                decoding: DecodingKey::from_secret(bytes),
                validation,
                issuer,
                audience,
                ttl,
            }),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        let secret = SecretString::new(config.secret.clone().into());
        Self::new(
            &secret,
            config.issuer.clone(),
            config.audience.clone(),
            Duration::days(config.expires_in_days),
        )
    }

    /// 사용자에 대한 새 Claims를 생성합니다.
    pub fn claims_for(&self, user_id: i64, email: &str, name: &str) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iss: self.inner.issuer.clone(),
            aud: self.inner.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.inner.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 사용자 토큰을 발급합니다.
    pub fn issue(&self, user_id: i64, email: &str, name: &str) -> Result<String, JwtError> {
        self.encode(&self.claims_for(user_id, email, name))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.inner.encoding)
            .map_err(JwtError::from)
    }

    /// 토큰을 디코딩하고 서명, 만료, 발급자, 대상을 검증합니다.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidToken,
                _ => JwtError::DecodingError,
            })
    }
}
