//! JWT 令牌校验
//!
//! 只负责验证和解析外部身份服务签发的令牌。

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | JWT_SECRET | (必须设置) | HS256 密钥，应至少 32 字节 |
/// | JWT_ISSUER | coral-auth | 令牌签发者 |
/// | JWT_AUDIENCE | booking-clients | 令牌受众 |
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 密钥 (与身份服务共享)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET not set, using development key");
                    "development-only-secret-do-not-deploy".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("JWT_SECRET must be set in production");
                }
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "coral-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "booking-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub name: String,
    /// 角色 (CLIENT | OWNER)
    pub role: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT 校验服务
#[derive(Debug)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// 验证令牌并返回 Claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// 从 Authorization 头提取 Bearer 令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(&JwtConfig::default())
    }
}
