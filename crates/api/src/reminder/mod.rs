pub mod find_events_in_window;
pub mod send_window_reminders;
