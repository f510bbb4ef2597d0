//! JWT 토큰 처리.
//!
//! HS256 단일 공유 시크릿으로 Access Token을 발급/검증합니다.
//! 서버는 세션 상태를 보관하지 않으며 폐기 목록도 없습니다.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use car_core::{AuthConfig, CoreError};

/// 발급/검증에 사용하는 유일한 알고리즘.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    #[serde(rename = "userID")]
    pub user_id: i64,
    /// 사용자 이름
    pub username: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 현재 시각 기준으로 Claims 생성.
    pub fn new(user_id: i64, username: impl Into<String>, ttl: TimeDelta) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[source] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("허용되지 않은 서명 알고리즘")]
    InvalidAlgorithm,
    #[error("서명 검증 실패")]
    InvalidSignature,
    #[error("잘못된 토큰 클레임")]
    InvalidClaims,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                JwtError::InvalidAlgorithm
            }
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => JwtError::InvalidClaims,
            _ => JwtError::InvalidToken,
        }
    }
}

/// 서명/검증 키와 토큰 수명.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    renew_grace: TimeDelta,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("ttl", &self.ttl)
            .field("renew_grace", &self.renew_grace)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// 시크릿과 수명(시간 단위)으로 키 생성.
    pub fn new(
        secret: &SecretString,
        ttl_hours: i64,
        renew_grace_hours: i64,
    ) -> Result<Self, CoreError> {
        let ttl = TimeDelta::try_hours(ttl_hours)
            .filter(|d| *d > TimeDelta::zero())
            .ok_or_else(|| CoreError::invalid("auth.token_ttl_hours", "out of range"))?;
        let renew_grace = TimeDelta::try_hours(renew_grace_hours)
            .filter(|d| *d >= TimeDelta::zero())
            .ok_or_else(|| CoreError::invalid("auth.renew_grace_hours", "out of range"))?;

        let bytes = secret.expose_secret().as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
            renew_grace,
        })
    }

    /// 인증 설정에서 키 생성. 시크릿이 없으면 시작 단계에서 실패합니다.
    pub fn from_config(config: &AuthConfig) -> Result<Self, CoreError> {
        let secret = config
            .jwt_secret
            .as_ref()
            .ok_or(CoreError::MissingSetting("auth.jwt_secret"))?;
        Self::new(secret, config.token_ttl_hours, config.renew_grace_hours)
    }

    /// 사용자에게 새 Access Token 발급.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        self.encode_claims(&Claims::new(user_id, username, self.ttl))
    }

    /// 주어진 Claims를 그대로 서명.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(TOKEN_ALGORITHM), claims, &self.encoding)
            .map_err(JwtError::EncodingError)
    }

    /// 토큰 검증 (서명, 알고리즘, 만료, 클레임 형태).
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding, &validation(true))?;
        check_subject(data.claims)
    }

    /// 갱신용 검증.
    ///
    /// 서명과 클레임은 [`verify`](Self::verify)와 동일하게 검사하지만,
    /// 만료 후 유예 기간 이내의 토큰은 허용합니다.
    pub fn verify_for_renewal(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding, &validation(false))?;
        let claims = check_subject(data.claims)?;

        let deadline = claims.exp.saturating_add(self.renew_grace.num_seconds());
        if Utc::now().timestamp() > deadline {
            return Err(JwtError::TokenExpired);
        }
        Ok(claims)
    }
}

fn validation(validate_exp: bool) -> Validation {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;
    validation.validate_exp = validate_exp;
    validation
}

// userID는 양의 정수여야 함
fn check_subject(claims: Claims) -> Result<Claims, JwtError> {
    if claims.user_id <= 0 {
        return Err(JwtError::InvalidClaims);
    }
    Ok(claims)
}
