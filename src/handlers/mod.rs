pub mod auth_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod material_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use auth_handler::{login, signup};
pub use health_handler::{health_check, health_check_ready};
pub use material_handler::extract_material;

/// Registers every route. Expects `Data<Arc<AppState>>`, `Data<JwtService>`
/// and `Data<Schema>` on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(signup)
        .service(login)
        .service(
            web::resource("/graphql")
                .wrap(AuthMiddleware)
                .route(web::post().to(graphql_handler::graphql)),
        )
        .route("/graphiql", web::get().to(graphql_handler::graphiql))
        .service(web::scope("/api").wrap(AuthMiddleware).service(extract_material));
}
