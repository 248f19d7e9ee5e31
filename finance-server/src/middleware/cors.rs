use std::future::{ready, Ready};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures::future::LocalBoxFuture;

use crate::env;
use crate::handlers::CORS_ALLOWED_HEADERS_VALUE;

const ANY_ORIGIN: &str = "*";
const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

#[derive(Clone, Debug)]
enum AllowedOrigins {
    Any,
    Listed(Vec<HeaderValue>),
}

impl AllowedOrigins {
    fn from_config(origins: &[String]) -> Self {
        if origins.iter().any(|origin| origin == ANY_ORIGIN) {
            return AllowedOrigins::Any;
        }

        let listed = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("Ignoring invalid CORS allowed origin: {origin}");
                    None
                }
            })
            .collect();

        AllowedOrigins::Listed(listed)
    }

    /// The value to send back in `Access-Control-Allow-Origin`, if `origin` may make requests.
    fn allow(&self, origin: &HeaderValue) -> Option<HeaderValue> {
        match self {
            AllowedOrigins::Any => Some(origin.clone()),
            AllowedOrigins::Listed(allowed) => allowed.iter().find(|a| *a == origin).cloned(),
        }
    }
}

fn insert_cors_headers(headers: &mut HeaderMap, allowed_origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}

fn insert_preflight_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOWED_HEADERS_VALUE),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
}

/// Adds CORS headers for origins listed in `FINANCE_CORS_ALLOWED_ORIGINS` (`*` allows every
/// origin) and answers preflight requests without calling the wrapped service.
pub struct CorsMiddleware {
    allowed_origins: AllowedOrigins,
}

impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::from_config(&env::CONF.cors_allowed_origins),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddlewareService {
            service,
            allowed_origins: self.allowed_origins.clone(),
        }))
    }
}

pub struct CorsMiddlewareService<S> {
    service: S,
    allowed_origins: AllowedOrigins,
}

impl<S, B> Service<ServiceRequest> for CorsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allowed_origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|origin| self.allowed_origins.allow(origin));

        if req.method() == Method::OPTIONS {
            let mut res = HttpResponse::Ok().finish();

            if let Some(allowed_origin) = allowed_origin {
                insert_cors_headers(res.headers_mut(), allowed_origin);
                insert_preflight_headers(res.headers_mut());
            }

            let res = req.into_response(res);
            return Box::pin(async move { Ok(res) });
        }

        let res_fut = self.service.call(req);

        Box::pin(async move {
            let mut res = res_fut.await?.map_into_boxed_body();

            if let Some(allowed_origin) = allowed_origin {
                insert_cors_headers(res.headers_mut(), allowed_origin);
            }

            Ok(res)
        })
    }
}
