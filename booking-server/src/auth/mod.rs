//! 认证模块 - JWT 校验
//!
//! Token issuance lives in the external identity service; this server only
//! verifies tokens and extracts the caller identity `(user_id, role)`.

mod extractor;
pub mod jwt;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};

use shared::models::Role;

use crate::utils::AppError;

/// Verified caller identity, extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    /// Reject callers that are not clients
    pub fn require_client(&self) -> Result<(), AppError> {
        if self.role != Role::Client {
            return Err(AppError::forbidden("Client role required"));
        }
        Ok(())
    }

    /// Reject callers that are not owners
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.role != Role::Owner {
            return Err(AppError::forbidden("Owner role required"));
        }
        Ok(())
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| format!("Invalid subject: {}", claims.sub))?;
        let role: Role = claims.role.parse()?;
        Ok(Self {
            id,
            name: claims.name,
            role,
        })
    }
}
