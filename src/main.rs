#![windows_subsystem = "windows"]

mod api;
mod chart;
mod config;
mod history;
mod metric;
mod poller;
mod ringbuf;
mod simulate;
mod theme;
mod ui;

#[cfg(test)]
mod test_support;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use ui::Dashboard;

/// `RUST_LOG` wins; otherwise this crate logs at info.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sysdash=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> iced::Result {
    init_logging();
    let config = Config::load();

    iced::application(Dashboard::title, Dashboard::update, Dashboard::view)
        .subscription(Dashboard::subscription)
        .theme(Dashboard::theme)
        .window(iced::window::Settings {
            size: (1280.0, 860.0).into(),
            min_size: Some((720.0, 560.0).into()),
            #[cfg(target_os = "linux")]
            platform_specific: iced::window::settings::PlatformSpecific {
                application_id: String::from("sysdash"),
                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(move || Dashboard::new(config))
}
