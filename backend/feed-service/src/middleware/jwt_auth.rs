/// JWT authentication middleware for Bearer token validation
/// Extracts user_id from JWT claims and adds it to request extensions
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::security::JwtKeys;

/// User ID extracted from JWT token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    keys: Arc<JwtKeys>,
}

impl JwtAuthMiddleware {
    pub fn new(keys: Arc<JwtKeys>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    keys: Arc<JwtKeys>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            // Read headers into owned values before touching extensions_mut
            let auth_header = match req.headers().get("Authorization") {
                Some(header) => match header.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => return Err(unauthorized("Invalid Authorization header")),
                },
                None => return Err(unauthorized("Missing Authorization header")),
            };

            let token = match auth_header.strip_prefix("Bearer ") {
                Some(t) => t.trim(),
                None => {
                    return Err(unauthorized(
                        "Invalid Authorization scheme, expected Bearer",
                    ))
                }
            };

            let user_id = match keys.validate_token(token) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("Token validation failed: {}", e);
                    return Err(unauthorized("Invalid or expired token"));
                }
            };

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

fn unauthorized(message: &str) -> Error {
    AppError::Authentication(message.to_string()).into()
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => ready(Err(unauthorized("User ID missing in request extensions"))),
        }
    }
}
