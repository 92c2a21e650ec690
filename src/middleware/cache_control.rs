use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{HeaderValue, CACHE_CONTROL},
        Method,
    },
    Error,
};
use futures_util::future::LocalBoxFuture;

/// Fixed Cache-Control tiers by path. There is no server-side cache store;
/// this only tells clients and proxies how long a GET response stays fresh.
/// Mutations and anything user-state sensitive are `no-store`.
fn cache_header_for(path: &str) -> &'static str {
    if path.starts_with("/api/auth") || path.contains("/notifications") {
        "no-store"
    } else if path.starts_with("/api/staff/available-shifts") {
        // Marketplace listings go stale the moment a shift is assigned.
        "private, max-age=10"
    } else if path.starts_with("/api/admin/available-shifts")
        || path.starts_with("/api/admin/staff")
    {
        "private, max-age=3600"
    } else {
        "private, max-age=60"
    }
}

pub struct CacheControl;

impl<S, B> Transform<S, ServiceRequest> for CacheControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CacheControlService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CacheControlService { service }))
    }
}

pub struct CacheControlService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CacheControlService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = if req.method() == Method::GET {
            cache_header_for(req.path())
        } else {
            "no-store"
        };

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            // Only successful responses get a freshness lifetime.
            if res.status().is_success() || header == "no-store" {
                res.headers_mut()
                    .insert(CACHE_CONTROL, HeaderValue::from_static(header));
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_notifications_are_never_cached() {
        assert_eq!(cache_header_for("/api/auth/me"), "no-store");
        assert_eq!(cache_header_for("/api/staff/notifications"), "no-store");
    }

    #[test]
    fn marketplace_gets_the_short_tier() {
        assert_eq!(
            cache_header_for("/api/staff/available-shifts"),
            "private, max-age=10"
        );
    }

    #[test]
    fn admin_reference_lists_get_the_long_tier() {
        assert_eq!(
            cache_header_for("/api/admin/staff"),
            "private, max-age=3600"
        );
        assert_eq!(
            cache_header_for("/api/admin/available-shifts"),
            "private, max-age=3600"
        );
    }

    #[test]
    fn everything_else_gets_the_medium_tier() {
        assert_eq!(
            cache_header_for("/api/staff/schedule"),
            "private, max-age=60"
        );
        assert_eq!(
            cache_header_for("/api/admin/stats/dashboard"),
            "private, max-age=60"
        );
    }
}
