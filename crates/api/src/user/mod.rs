mod create_user;
mod subscribers;

use actix_web::web;
use create_user::create_user_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(create_user_controller));
}
