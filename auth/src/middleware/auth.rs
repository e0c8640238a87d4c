use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use crate::services::identity::IdentityClient;

/// Resolves the `Authorization: Bearer` header into an [`AuthUser`]
/// request extension, rejecting the request with 401 otherwise.
///
/// [`AuthUser`]: crate::services::identity::AuthUser
pub struct AuthMiddleware {
    identity_url: Rc<String>,
    identity_api_key: Rc<String>,
}

impl AuthMiddleware {
    pub fn new(identity_url: String, api_key: String) -> Self {
        AuthMiddleware {
            identity_url: Rc::new(identity_url),
            identity_api_key: Rc::new(api_key),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
            identity_url: self.identity_url.clone(),
            api_key: self.identity_api_key.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
    identity_url: Rc<String>,
    api_key: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token_value = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| {
                if header.starts_with("Bearer ") {
                    Some(header[7..].to_string())
                } else {
                    None
                }
            });

        let identity_client = IdentityClient::new(
            self.identity_url.as_ref().to_string(),
            self.api_key.as_ref().to_string(),
        );

        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = token_value {
                // resolve token and insert the user into the request object
                // for the wrapped handlers
                match identity_client.get_user(&token).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                        srv.call(req).await.map(|res| res.map_into_boxed_body())
                    }
                    Err(_) => {
                        let response = HttpResponse::Unauthorized()
                            .json(serde_json::json!({"error": "Unauthorized"}))
                            .map_into_boxed_body();
                        Ok(req.into_response(response))
                    }
                }
            } else {
                // no token passed - 401
                let response = HttpResponse::Unauthorized()
                    .json(serde_json::json!({"error": "Unauthorized"}))
                    .map_into_boxed_body();
                Ok(req.into_response(response))
            }
        })
    }
}
