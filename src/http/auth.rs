//! Bearer-JWT extractor for admin-only routes.
//!
//! Tokens are minted by the account service; this server only verifies
//! them and reads the `admin` claim.

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, FromRequest, HttpRequest, Result as ActixResult,
};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::settings;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
    #[serde(default)]
    pub admin: bool,
}

/// Extracts and validates `Authorization: Bearer <JWT>`.
#[derive(Debug, Clone)]
pub struct JwtAuth {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl FromRequest for JwtAuth {
    type Error = actix_web::Error;
    type Future = Ready<ActixResult<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let res = (|| {
            let hdr = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| ErrorUnauthorized("missing Authorization header"))?;

            let token = hdr
                .strip_prefix("Bearer ")
                .ok_or_else(|| ErrorUnauthorized("malformed Authorization header"))?;

            let secret = settings()
                .jwt_secret
                .as_deref()
                .ok_or_else(|| ErrorUnauthorized("server mis-config"))?;
            let data = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|_| ErrorUnauthorized("invalid / expired token"))?;

            let user_id =
                Uuid::parse_str(&data.claims.sub).map_err(|_| ErrorUnauthorized("bad sub"))?;

            Ok(JwtAuth {
                user_id,
                is_admin: data.claims.admin,
            })
        })();

        ready(res)
    }
}
