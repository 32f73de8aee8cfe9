mod cancel_registration;
mod get_user_registrations;
mod register_for_event;
mod subscribers;

use actix_web::web;
use cancel_registration::cancel_registration_controller;
use get_user_registrations::get_user_registrations_controller;
use register_for_event::register_for_event_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/registrations",
        web::post().to(register_for_event_controller),
    );
    cfg.route(
        "/events/{event_id}/registrations/{user_id}",
        web::delete().to(cancel_registration_controller),
    );
    cfg.route(
        "/users/{user_id}/registrations",
        web::get().to(get_user_registrations_controller),
    );
}
