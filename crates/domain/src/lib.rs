mod event;
mod registration;
mod reminder;
mod shared;
mod timespan;
mod user;

pub use event::{Attendee, Event};
pub use registration::Registration;
pub use reminder::{ReminderWindow, WindowKind};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use timespan::TimeSpan;
pub use user::User;
