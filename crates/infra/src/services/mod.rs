mod notifier;

pub use notifier::{
    INotifier, InMemoryNotifier, LogNotifier, NovuNotifier, Recipient, SentNotification,
};
