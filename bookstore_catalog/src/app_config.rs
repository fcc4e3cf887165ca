use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{App, HttpResponse};
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;

use crate::api::ErrorResponse;
use crate::books_repository::BookRepository;
use crate::handlers;
use crate::static_files::{config_static, StaticAssets};

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/api/books")
                .service(
                    web::resource("")
                        .route(web::get().to(handlers::get_all_books))
                        .route(web::post().to(handlers::add_book)),
                )
                .service(
                    web::resource("/stats/count").route(web::get().to(handlers::count_books)),
                )
                .service(
                    web::resource("/{book_id}")
                        .route(web::get().to(handlers::get_book))
                        .route(web::put().to(handlers::update_book))
                        .route(web::delete().to(handlers::delete_book)),
                ),
        );
}

/// API routes with their OpenAPI document, plus the web page and error envelopes around them
pub fn build_app(
    books_repository: Arc<dyn BookRepository>,
    static_assets: StaticAssets,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap_api()
        .app_data(web::Data::new(books_repository))
        .app_data(
            actix_web::web::JsonConfig::default().error_handler(handlers::json_error_handler),
        )
        .configure(config_app)
        .with_json_spec_at("/apispec/v2")
        .build()
        .app_data(actix_web::web::Data::new(static_assets))
        .configure(config_static)
        .default_service(actix_web::web::to(handlers::not_found))
        .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error))
        .wrap(TracingLogger::default())
}

/// Replaces 500 responses that don't already carry a JSON error with the generic one
fn internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let has_json_body = res
        .response()
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if has_json_body {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError()
        .json(ErrorResponse::new("Internal server error"));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
