//! Link API: create batches and read statistics

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use super::helpers::blocking_api;
use crate::errors::ShortboxError;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::ShortenItem;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub items: Vec<ShortenRequestItem>,
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequestItem {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub validity: Option<ValidityInput>,
    #[serde(default)]
    pub shortcode: Option<String>,
}

/// Validity may come as a JSON number or as the raw text of a form field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValidityInput {
    Number(serde_json::Number),
    Text(String),
}

impl From<ShortenRequestItem> for ShortenItem {
    fn from(item: ShortenRequestItem) -> Self {
        let validity = item.validity.map(|v| match v {
            ValidityInput::Number(n) => n.to_string(),
            ValidityInput::Text(s) => s,
        });
        ShortenItem {
            url: item.url,
            validity,
            shortcode: item.shortcode,
        }
    }
}

/// POST /api/shorten
pub async fn shorten(
    ctx: web::Data<AppContext>,
    body: web::Json<ShortenRequest>,
) -> impl Responder {
    let items: Vec<ShortenItem> = body.into_inner().items.into_iter().map(Into::into).collect();
    let service = ctx.link_service.clone();
    blocking_api(move || service.create_batch(&items)).await
}

/// GET /api/stats
pub async fn list_stats(ctx: web::Data<AppContext>) -> impl Responder {
    let service = ctx.link_service.clone();
    blocking_api(move || Ok::<_, ShortboxError>(service.list_all())).await
}

/// GET /api/stats/{code}
pub async fn get_stats(ctx: web::Data<AppContext>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner();
    let service = ctx.link_service.clone();
    blocking_api(move || service.get(&code)).await
}
