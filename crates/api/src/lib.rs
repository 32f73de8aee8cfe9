mod error;
mod event;
mod job_schedulers;
mod registration;
mod reminder;
mod shared;
mod status;
mod user;

use actix_cors::Cors;
use actix_web::{dev::Server, web, App, HttpServer};
use events_api_infra::EventsContext;
use job_schedulers::JobSchedulers;
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use reminder::send_window_reminders::ReminderRunReport;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    event::configure_routes(cfg);
    registration::configure_routes(cfg);
    status::configure_routes(cfg);
    user::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    schedulers: JobSchedulers,
}

impl Application {
    pub async fn new(context: EventsContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let schedulers = JobSchedulers::start(context);

        Ok(Self {
            server,
            port,
            schedulers,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: EventsContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves until the server shuts down and then stops the job schedulers
    pub async fn start(self) -> Result<(), std::io::Error> {
        info!("Listening on port: {}", self.port);
        let res = self.server.await;
        self.schedulers.stop().await;
        res
    }
}
