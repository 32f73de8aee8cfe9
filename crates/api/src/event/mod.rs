mod create_event;
mod delete_event;
mod get_event;
mod get_event_attendees;
mod list_events;
mod subscribers;
mod update_event;

use actix_web::web;
use create_event::create_event_controller;
use delete_event::delete_event_controller;
use get_event::get_event_controller;
use get_event_attendees::get_event_attendees_controller;
use list_events::list_events_controller;
use update_event::update_event_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events", web::get().to(list_events_controller));
    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route("/events/{event_id}", web::put().to(update_event_controller));
    cfg.route(
        "/events/{event_id}",
        web::delete().to(delete_event_controller),
    );
    cfg.route(
        "/events/{event_id}/attendees",
        web::get().to(get_event_attendees_controller),
    );
}
