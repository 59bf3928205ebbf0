use application::auth::{TokenService, UserClaims};
use application::error::AppError;
use bcrypt::hash as bcrypt_hash;
use bcrypt::verify as bcrypt_verify;
use chrono::Utc;
use domain::value::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use serde::{Deserialize, Serialize};

pub trait AuthConfig {
    fn jwt_secret(&self) -> &str;
    fn jwt_expire_secs(&self) -> i64;
    fn salt_cost(&self) -> i32;
}

#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    salt_cost: i32,
}

impl BcryptPasswordHasher {
    pub fn new(salt_cost: i32) -> Self {
        Self { salt_cost }
    }
}

impl application::auth::PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        bcrypt_hash(plain, self.salt_cost as u32)
            .map_err(|e| AppError::AuthError(e.to_string()))
    }

    fn verify(&self, pwd: &str, hashed_pwd: &str) -> Result<(), AppError> {
        if bcrypt_verify(pwd, hashed_pwd).unwrap_or(false) {
            Ok(())
        } else {
            Err(AppError::AuthError("invalid password".to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtTokenService {
    jwt_secret: String,
    exp_secs: i64,
}

impl JwtTokenService {
    pub fn new(jwt_secret: &str, exp_secs: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            exp_secs,
        }
    }
}

/// sub 为用户 id，name 为签发时的用户名
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub name: String,
    pub adm: bool,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    fn new(claims: &UserClaims, exp_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: claims.user_id.to_string(),
            name: claims.username.clone(),
            adm: claims.is_admin,
            exp: now + exp_secs,
            iat: now,
        }
    }
}

impl TryFrom<JwtClaims> for UserClaims {
    type Error = AppError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("invalid subject".to_string()))?;
        Ok(Self {
            user_id: UserId::from(id),
            username: claims.name,
            is_admin: claims.adm,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError> {
        let claims: JwtClaims = JwtClaims::new(claims, self.exp_secs);
        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let header = Header::new(Algorithm::HS256);
        let token =
            encode(&header, &claims, &key).map_err(|e| AppError::AuthError(e.to_string()))?;
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::AuthError(e.to_string()))?;

        token_data.claims.try_into()
    }
}
