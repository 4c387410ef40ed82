//! Short link resolution over HTTP

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, error, trace};

use crate::errors::ShortboxError;
use crate::runtime::lifetime::startup::AppContext;
use crate::utils::is_valid_short_code;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        ctx: web::Data<AppContext>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            // 非法短码，直接 404，不读存储
            trace!("Invalid short code rejected: {}", &code);
            return Self::not_found_response();
        }

        let referrer = req
            .headers()
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let service = ctx.link_service.clone();
        let result = web::block(move || service.resolve(&code, referrer.as_deref())).await;

        match result {
            Ok(Ok(target)) => Self::finish_redirect(&target),
            Ok(Err(ShortboxError::NotFound(msg))) => {
                debug!("{}", msg);
                Self::not_found_response()
            }
            Ok(Err(ShortboxError::Expired(msg))) => {
                debug!("{}", msg);
                Self::gone_response()
            }
            Ok(Err(e)) => {
                error!("Resolution failed: {}", e);
                Self::error_response()
            }
            Err(e) => {
                error!("Blocking task failed during redirect: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn finish_redirect(target: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header((header::LOCATION, target))
            .finish()
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Not Found")
    }

    #[inline]
    fn gone_response() -> HttpResponse {
        HttpResponse::build(StatusCode::GONE)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Gone")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
