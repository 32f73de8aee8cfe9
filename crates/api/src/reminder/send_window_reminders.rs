use super::find_events_in_window::FindEventsInWindowUseCase;
use crate::shared::usecase::{execute, UseCase};
use events_api_domain::{Attendee, Event, ReminderWindow};
use events_api_infra::{EventsContext, Recipient};
use futures::stream::{self, StreamExt};
use serde_json::json;
use tracing::{error, info, warn};

const MARK_VALUE: &str = "sent";

/// Sends the reminders of one `ReminderWindow` to the attendees of every
/// `Event` that is due, at most once per `Event`.
///
/// An `Event` is claimed by atomically writing its mark before any
/// attendee is notified, so overlapping runs never notify twice.
/// When the cache is unavailable the run notifies anyway and tries to
/// write the mark afterwards.
#[derive(Debug)]
pub struct SendWindowRemindersUseCase {
    pub window: ReminderWindow,
}

/// What a single run did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReminderRunReport {
    pub events_found: usize,
    /// `Event`s already handled by an earlier or concurrent run
    pub events_skipped: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub mark_failures: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    FetchFailure,
}

enum Claim {
    Claimed,
    AlreadyClaimed,
    CacheUnavailable,
}

enum EventOutcome {
    Skipped,
    Dispatched {
        sent: usize,
        failed: usize,
        mark_failed: bool,
    },
}

impl ReminderRunReport {
    fn add(&mut self, outcome: EventOutcome) {
        match outcome {
            EventOutcome::Skipped => self.events_skipped += 1,
            EventOutcome::Dispatched {
                sent,
                failed,
                mark_failed,
            } => {
                self.notifications_sent += sent;
                self.notifications_failed += failed;
                if mark_failed {
                    self.mark_failures += 1;
                }
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendWindowRemindersUseCase {
    type Response = ReminderRunReport;
    type Error = UseCaseError;

    const NAME: &'static str = "SendWindowReminders";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let find_events = FindEventsInWindowUseCase {
            now_ts: ctx.sys.get_timestamp_millis(),
            offset: self.window.offset,
            tolerance: self.window.tolerance,
        };
        let events = execute(find_events, ctx)
            .await
            .map_err(|_| UseCaseError::FetchFailure)?;

        let window = &self.window;
        let mut report = ReminderRunReport {
            events_found: events.len(),
            ..Default::default()
        };
        let outcomes = stream::iter(events.iter().map(|event| remind_event(window, event, ctx)))
            .buffer_unordered(ctx.config.notifier_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;
        for outcome in outcomes {
            report.add(outcome);
        }

        info!(
            "{} reminders run done. Events found: {}, skipped: {}. Notifications sent: {}, failed: {}. Mark failures: {}",
            window.kind,
            report.events_found,
            report.events_skipped,
            report.notifications_sent,
            report.notifications_failed,
            report.mark_failures
        );
        Ok(report)
    }
}

async fn claim(window: &ReminderWindow, key: &str, ctx: &EventsContext) -> Claim {
    match ctx
        .cache
        .set_if_absent(key, MARK_VALUE, window.mark_ttl)
        .await
    {
        Ok(true) => Claim::Claimed,
        Ok(false) => Claim::AlreadyClaimed,
        Err(e) => {
            warn!(
                "Unable to claim reminder mark: {}, sending reminders without it. Error: {:?}",
                key, e
            );
            Claim::CacheUnavailable
        }
    }
}

async fn remind_event(window: &ReminderWindow, event: &Event, ctx: &EventsContext) -> EventOutcome {
    let key = window.mark_key(&event.id);
    let claim = claim(window, &key, ctx).await;
    if let Claim::AlreadyClaimed = claim {
        info!(
            "{} reminders for event: {} already sent, skipping",
            window.kind, event.id
        );
        return EventOutcome::Skipped;
    }

    let results = stream::iter(
        event
            .attendees
            .iter()
            .map(|attendee| remind_attendee(window, event, attendee, ctx)),
    )
    .buffer_unordered(ctx.config.notifier_concurrency.max(1))
    .collect::<Vec<_>>()
    .await;
    let sent = results.iter().filter(|delivered| **delivered).count();
    let failed = results.len() - sent;

    let mut mark_failed = false;
    if let Claim::CacheUnavailable = claim {
        if let Err(e) = ctx.cache.set(&key, MARK_VALUE, window.mark_ttl).await {
            error!(
                "Unable to write reminder mark: {}, reminders may be sent again. Error: {:?}",
                key, e
            );
            mark_failed = true;
        }
    }

    EventOutcome::Dispatched {
        sent,
        failed,
        mark_failed,
    }
}

async fn remind_attendee(
    window: &ReminderWindow,
    event: &Event,
    attendee: &Attendee,
    ctx: &EventsContext,
) -> bool {
    let workflow_id = ctx.config.workflows.for_window(window.kind);
    let payload = json!({
        "name": attendee.user.name,
        "eventTitle": event.title,
        "eventLocation": event.location,
        "eventTime": event.formatted_start(),
        "eventDescription": event.description,
    });

    match ctx
        .notifier
        .trigger(workflow_id, &Recipient::from(&attendee.user), payload)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Failed to send {} reminder to: {} for event: {}. Error: {:?}",
                window.kind, attendee.user.email, event.id, e
            );
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_domain::{Registration, TimeSpan, User, ID};
    use events_api_infra::{ICache, IEventRepo, InMemoryNotifier, StaticTimeSys};
    use std::sync::Arc;
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 1000 * 60;
    const HOUR: i64 = MINUTE * 60;

    struct TestContext {
        ctx: EventsContext,
        notifier: Arc<InMemoryNotifier>,
        sys: Arc<StaticTimeSys>,
    }

    fn setup() -> TestContext {
        let sys = Arc::new(StaticTimeSys::new(NOW));
        let mut ctx = EventsContext::create_inmemory_with_sys(sys.clone());
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.notifier = notifier.clone();
        TestContext { ctx, notifier, sys }
    }

    async fn insert_event(ctx: &EventsContext, title: &str, start_ts: i64) -> Event {
        let event = Event::new(
            title.into(),
            "Bring a laptop".into(),
            "Oslo".into(),
            start_ts,
            ID::default(),
            0,
        );
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    async fn register(ctx: &EventsContext, name: &str, event: &Event) -> User {
        let user = User::new(name.into(), format!("{}@example.com", name), 0);
        ctx.repos.users.insert(&user).await.unwrap();
        let registration = Registration::new(user.id.clone(), event.id.clone(), 0);
        ctx.repos.registrations.insert(&registration).await.unwrap();
        user
    }

    async fn run(window: ReminderWindow, ctx: &EventsContext) -> ReminderRunReport {
        execute(SendWindowRemindersUseCase { window }, ctx)
            .await
            .expect("Reminders run to succeed")
    }

    struct UnavailableCache;

    #[async_trait::async_trait]
    impl ICache for UnavailableCache {
        async fn exists(&self, _key: &str) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn set_if_absent(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn delete(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Connection refused"))
        }
    }

    struct UnavailableEventRepo;

    #[async_trait::async_trait]
    impl IEventRepo for UnavailableEventRepo {
        async fn insert(&self, _e: &Event) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn save(&self, _e: &Event) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn find(&self, _event_id: &ID) -> Option<Event> {
            None
        }

        async fn find_all(&self) -> anyhow::Result<Vec<Event>> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn find_between(&self, _timespan: &TimeSpan) -> anyhow::Result<Vec<Event>> {
            Err(anyhow::anyhow!("Connection refused"))
        }

        async fn delete(&self, _event_id: &ID, _deleted: i64) -> Option<Event> {
            None
        }
    }

    #[actix_web::main]
    #[test]
    async fn reminds_every_attendee_of_tomorrows_event() {
        let TestContext { ctx, notifier, .. } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + 24 * HOUR).await;
        let ada = register(&ctx, "ada", &event).await;
        let bob = register(&ctx, "bob", &event).await;

        let report = run(ReminderWindow::twenty_four_hours(), &ctx).await;
        assert_eq!(
            report,
            ReminderRunReport {
                events_found: 1,
                notifications_sent: 2,
                ..Default::default()
            }
        );

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        for user in &[ada, bob] {
            let notification = sent
                .iter()
                .find(|n| n.recipient.email == user.email)
                .expect("Attendee to be reminded");
            assert_eq!(notification.workflow_id, "event-24h-reminder");
            assert_eq!(notification.recipient.subscriber_id, user.email);
            assert_eq!(notification.payload["name"], user.name.as_str());
            assert_eq!(notification.payload["eventTitle"], "Rust meetup");
            assert_eq!(notification.payload["eventLocation"], "Oslo");
            assert_eq!(notification.payload["eventDescription"], "Bring a laptop");
            assert_eq!(
                notification.payload["eventTime"],
                event.formatted_start().as_str()
            );
        }
        assert!(ctx
            .cache
            .exists(&format!("reminder:24h:{}", event.id))
            .await
            .unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn tomorrows_event_gets_no_one_hour_reminder() {
        let TestContext { ctx, notifier, .. } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + 24 * HOUR).await;
        register(&ctx, "ada", &event).await;

        let report = run(ReminderWindow::one_hour(), &ctx).await;
        assert_eq!(report, ReminderRunReport::default());
        assert!(notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn reminds_of_event_in_an_hour_and_five_minutes() {
        let TestContext { ctx, notifier, .. } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + HOUR + 5 * MINUTE).await;
        register(&ctx, "ada", &event).await;

        let report = run(ReminderWindow::one_hour(), &ctx).await;
        assert_eq!(report.notifications_sent, 1);
        let sent = notifier.sent();
        assert_eq!(sent[0].workflow_id, "event-1h-reminder");
        assert!(ctx
            .cache
            .exists(&format!("reminder:1h:{}", event.id))
            .await
            .unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn second_run_within_the_hour_sends_nothing() {
        let TestContext {
            ctx, notifier, sys, ..
        } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + 24 * HOUR).await;
        register(&ctx, "ada", &event).await;
        register(&ctx, "bob", &event).await;

        run(ReminderWindow::twenty_four_hours(), &ctx).await;
        sys.advance(20 * MINUTE);
        let report = run(ReminderWindow::twenty_four_hours(), &ctx).await;

        assert_eq!(
            report,
            ReminderRunReport {
                events_found: 1,
                events_skipped: 1,
                ..Default::default()
            }
        );
        assert_eq!(notifier.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn overlapping_runs_notify_each_attendee_once() {
        let TestContext { ctx, notifier, .. } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + HOUR).await;
        register(&ctx, "ada", &event).await;
        register(&ctx, "bob", &event).await;

        let (first, second) = futures::join!(
            run(ReminderWindow::one_hour(), &ctx),
            run(ReminderWindow::one_hour(), &ctx)
        );

        assert_eq!(first.events_skipped + second.events_skipped, 1);
        assert_eq!(
            first.notifications_sent + second.notifications_sent,
            2
        );
        assert_eq!(notifier.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn event_without_attendees_is_marked_without_notifying() {
        let TestContext { ctx, notifier, .. } = setup();
        let event = insert_event(&ctx, "Empty room", NOW + 24 * HOUR).await;

        let report = run(ReminderWindow::twenty_four_hours(), &ctx).await;
        assert_eq!(
            report,
            ReminderRunReport {
                events_found: 1,
                ..Default::default()
            }
        );
        assert!(notifier.sent().is_empty());
        assert!(ctx
            .cache
            .exists(&format!("reminder:24h:{}", event.id))
            .await
            .unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn failing_attendee_does_not_affect_others() {
        let TestContext { ctx, notifier, .. } = setup();
        let x = insert_event(&ctx, "X", NOW + 24 * HOUR).await;
        let y = insert_event(&ctx, "Y", NOW + 24 * HOUR + 10 * MINUTE).await;
        let a = register(&ctx, "a", &x).await;
        let b = register(&ctx, "b", &x).await;
        let c = register(&ctx, "c", &y).await;
        notifier.fail_for(&a.email);

        let report = run(ReminderWindow::twenty_four_hours(), &ctx).await;
        assert_eq!(
            report,
            ReminderRunReport {
                events_found: 2,
                notifications_sent: 2,
                notifications_failed: 1,
                ..Default::default()
            }
        );

        let reminded = notifier
            .sent()
            .into_iter()
            .map(|n| n.recipient.email)
            .collect::<Vec<_>>();
        assert!(reminded.contains(&b.email));
        assert!(reminded.contains(&c.email));
        assert!(!reminded.contains(&a.email));

        // Marked despite the failure, so `a` is not retried
        for event in &[x, y] {
            assert!(ctx
                .cache
                .exists(&format!("reminder:24h:{}", event.id))
                .await
                .unwrap());
        }
    }

    #[actix_web::main]
    #[test]
    async fn sends_reminders_when_cache_is_unavailable() {
        let TestContext {
            mut ctx, notifier, ..
        } = setup();
        ctx.cache = Arc::new(UnavailableCache);
        let event = insert_event(&ctx, "Rust meetup", NOW + HOUR).await;
        register(&ctx, "ada", &event).await;

        let report = run(ReminderWindow::one_hour(), &ctx).await;
        assert_eq!(
            report,
            ReminderRunReport {
                events_found: 1,
                notifications_sent: 1,
                mark_failures: 1,
                ..Default::default()
            }
        );
        assert_eq!(notifier.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn fetch_failure_fails_the_run() {
        let TestContext {
            mut ctx, notifier, ..
        } = setup();
        ctx.repos.events = Arc::new(UnavailableEventRepo);

        let res = execute(
            SendWindowRemindersUseCase {
                window: ReminderWindow::twenty_four_hours(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::FetchFailure)));
        assert!(notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn mark_expires_after_its_ttl() {
        let TestContext {
            ctx, notifier, sys, ..
        } = setup();
        let event = insert_event(&ctx, "Rust meetup", NOW + 24 * HOUR).await;
        register(&ctx, "ada", &event).await;
        run(ReminderWindow::twenty_four_hours(), &ctx).await;

        let key = format!("reminder:24h:{}", event.id);
        sys.set(NOW + 47 * HOUR);
        assert!(ctx.cache.exists(&key).await.unwrap());
        sys.set(NOW + 49 * HOUR);
        assert!(!ctx.cache.exists(&key).await.unwrap());
        assert_eq!(notifier.sent().len(), 1);
    }
}
