use crate::reminder::send_window_reminders::SendWindowRemindersUseCase;
use crate::shared::usecase::execute;
use events_api_domain::ReminderWindow;
use events_api_infra::{EventsContext, ReminderJobConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, info_span, warn};
use tracing_futures::Instrument;

/// The reminder jobs, one timer per `ReminderWindow`.
///
/// Every tick spawns a reminders run of its own, so a slow run never
/// holds back the timer. Stopping ends the timers and lets runs that
/// are in flight finish.
pub struct JobSchedulers {
    stop: watch::Sender<bool>,
    jobs: Vec<JoinHandle<()>>,
}

impl JobSchedulers {
    pub fn start(ctx: EventsContext) -> Self {
        let (stop, stopped) = watch::channel(false);
        let jobs = ctx
            .config
            .reminder_jobs()
            .into_iter()
            .map(|job| start_reminder_job(ctx.clone(), job.clone(), stopped.clone()))
            .collect();

        Self { stop, jobs }
    }

    pub async fn stop(self) {
        let _ = self.stop.send(true);
        for job in self.jobs {
            let _ = job.await;
        }
    }
}

fn start_reminder_job(
    ctx: EventsContext,
    job: ReminderJobConfig,
    mut stopped: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let kind = job.window.kind;
    if !job.window.covers_interval(job.interval) {
        warn!(
            "{} reminders run every {:?} but only look {:?} around their target. Events may be missed.",
            kind, job.interval, job.window.tolerance
        );
    }

    actix_web::rt::spawn(
        async move {
            let mut timer = interval(job.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            timer.tick().await;
            info!("Scheduled {} reminders every {:?}", kind, job.interval);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        actix_web::rt::spawn(
                            send_reminders(ctx.clone(), job.window.clone())
                                .instrument(info_span!("reminders_run", window = %kind)),
                        );
                    }
                    _ = stopped.changed() => {
                        info!("Stopped {} reminders", kind);
                        break;
                    }
                }
            }
        }
        .instrument(info_span!("reminders_job", window = %kind)),
    )
}

async fn send_reminders(ctx: EventsContext, window: ReminderWindow) {
    // Failures are logged by `execute` and retried on the next tick
    let _ = execute(SendWindowRemindersUseCase { window }, &ctx).await;
}
