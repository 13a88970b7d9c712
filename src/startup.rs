use actix_web::{web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::AuthService;
use crate::configuration::JwtSettings;
use crate::db::UserStore;
use crate::middleware::{JwtMiddleware, RequestLogging};
use crate::routes::{get_current_user, health_check, login, refresh, register};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let store = UserStore::new(connection);
    let auth_service = AuthService::new(store.clone(), jwt_config.clone());

    let store = web::Data::new(store);
    let auth_service = web::Data::new(auth_service);
    let jwt_config_data = web::Data::new(jwt_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(RequestLogging)

            // Shared state
            .app_data(store.clone())
            .app_data(auth_service.clone())
            .app_data(jwt_config_data.clone())

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))

            // Refresh is guarded against the refresh secret; everything
            // else protected is guarded against the access secret
            .service(
                web::resource("/auth/refresh")
                    .wrap(JwtMiddleware::refresh(jwt_config.clone()))
                    .route(web::post().to(refresh)),
            )
            .service(
                web::resource("/auth/me")
                    .wrap(JwtMiddleware::access(jwt_config.clone()))
                    .route(web::get().to(get_current_user)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
