//! Request ID middleware
//!
//! 沿用调用方传入的 `X-Request-ID`（格式合法时），否则生成 UUID。
//! 该 id 写入请求扩展供 `RequestContext` 读取，并作为 `request` span 的字段；
//! 认证通过后 auth 中间件会在同一 span 上补记 `user_id`。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, field, info_span, trace};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 调用方 id 的最大长度
const MAX_REQUEST_ID_LEN: usize = 64;

/// Stored in request extensions, read by the `RequestContext` extractor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse the caller's id when it is a short token of `[A-Za-z0-9_-]`
    pub fn from_request(req: &ServiceRequest) -> Self {
        let incoming = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| Self::is_acceptable(id));

        match incoming {
            Some(id) => Self(id.to_string()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }

    fn is_acceptable(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_REQUEST_ID_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

#[derive(Clone, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let RequestId(request_id) = RequestId::from_request(&req);

        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
            user_id = field::Empty,
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;
                trace!("Completed with {}", response.status());

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn resolve(header: Option<&str>) -> String {
        let mut req = TestRequest::get().uri("/health/live");
        if let Some(value) = header {
            req = req.insert_header((REQUEST_ID_HEADER, value));
        }
        RequestId::from_request(&req.to_srv_request()).0
    }

    #[test]
    fn test_caller_id_is_reused() {
        assert_eq!(resolve(Some("trace-me_123")), "trace-me_123");
        assert_eq!(resolve(Some("  abc  ")), "abc");
    }

    #[test]
    fn test_unusable_caller_id_is_replaced() {
        let long = "x".repeat(65);
        for bad in ["", "has space", "semi;colon", long.as_str()] {
            let id = resolve(Some(bad));
            assert_ne!(id, bad);
            assert!(Uuid::parse_str(&id).is_ok());
        }
        assert!(Uuid::parse_str(&resolve(None)).is_ok());
    }
}
