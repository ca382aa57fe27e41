use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Subscription, Task};

use crate::api::{ApiClient, HistoryPoint, StatsOutcome};
use crate::config::Config;
use crate::history::{HistoryPanel, HistoryRequest, ViewMode};
use crate::metric::{self, Metric, MetricVisual};
use crate::poller::{CycleTicket, LivePoller};
use crate::theme::{self, MetricStyle, ThemeKind};

// ─── MESSAGE ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    /// Poll interval elapsed.
    Tick,
    StatsFetched(CycleTicket, StatsOutcome),
    SelectView(Metric, ViewMode),
    HistoryFetched(HistoryRequest, Vec<HistoryPoint>),
    ToggleThemeMenu,
    SelectTheme(&'static str),
    TogglePolling,
}

// ─── APP STATE ──────────────────────────────────────────────────

pub struct Dashboard {
    config: Config,
    api: ApiClient,
    poller: LivePoller,
    theme: &'static theme::Theme,
    theme_menu_open: bool,
    panels: [HistoryPanel; 3],
}

impl Dashboard {
    /// Build the dashboard and kick off the first poll immediately.
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let mut dashboard = Self::build(config);
        let task = match dashboard.poller.start() {
            Some(ticket) => dashboard.poll(ticket),
            None => Task::none(),
        };
        (dashboard, task)
    }

    /// Stopped dashboard with nothing fetched yet.
    fn build(config: Config) -> Self {
        let api = ApiClient::new(config.api_base_url.clone(), config.stats_timeout())
            .with_history_timeout(config.history_timeout());
        tracing::info!(
            base_url = api.base_url(),
            interval_ms = config.poll_interval_ms,
            window = config.live_window,
            "dashboard ready"
        );
        Self {
            poller: LivePoller::new(config.live_window),
            api,
            config,
            theme: theme::default_theme(),
            theme_menu_open: false,
            panels: [
                HistoryPanel::new(Metric::Cpu),
                HistoryPanel::new(Metric::Ram),
                HistoryPanel::new(Metric::Disk),
            ],
        }
    }

    pub fn title(&self) -> String {
        String::from("System Resource Monitor")
    }

    pub fn theme(&self) -> iced::Theme {
        self.theme.iced_theme()
    }

    /// The interval timer only exists while polling runs; dropping it is
    /// what cancels the pending tick.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.poller.is_running() {
            iced::time::every(self.config.poll_interval()).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => match self.poller.begin_cycle() {
                Some(ticket) => self.poll(ticket),
                None => Task::none(),
            },
            Message::StatsFetched(ticket, outcome) => {
                self.poller.complete_cycle(ticket, outcome, chrono::Local::now());
                Task::none()
            }
            Message::SelectView(metric, mode) => {
                let Some(panel) = self.panel_mut(metric) else {
                    return Task::none();
                };
                match panel.select_mode(mode) {
                    Some(request) => self.fetch_history(request),
                    None => Task::none(),
                }
            }
            Message::HistoryFetched(request, points) => {
                if let Some(panel) = self.panel_mut(request.metric) {
                    panel.apply(request.generation, points);
                }
                Task::none()
            }
            Message::ToggleThemeMenu => {
                self.theme_menu_open = !self.theme_menu_open;
                Task::none()
            }
            Message::SelectTheme(id) => {
                match theme::select_theme(id) {
                    Ok(selected) => {
                        if selected.id != self.theme.id {
                            tracing::info!(theme = selected.id, "theme changed");
                        }
                        self.theme = selected;
                    }
                    Err(e) => tracing::warn!(error = %e, "ignoring theme selection"),
                }
                self.theme_menu_open = false;
                Task::none()
            }
            Message::TogglePolling => {
                if self.poller.is_running() {
                    self.poller.stop();
                    Task::none()
                } else {
                    match self.poller.start() {
                        Some(ticket) => self.poll(ticket),
                        None => Task::none(),
                    }
                }
            }
        }
    }

    fn poll(&self, ticket: CycleTicket) -> Task<Message> {
        let api = self.api.clone();
        Task::perform(
            async move { api.fetch_current_stats().await },
            move |outcome| Message::StatsFetched(ticket, outcome),
        )
    }

    fn fetch_history(&self, request: HistoryRequest) -> Task<Message> {
        let api = self.api.clone();
        Task::perform(
            async move { api.fetch_history(request.period).await },
            move |points| Message::HistoryFetched(request, points),
        )
    }

    fn panel_mut(&mut self, metric: Metric) -> Option<&mut HistoryPanel> {
        self.panels.iter_mut().find(|p| p.metric() == metric)
    }

    fn threshold(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cpu => Some(self.config.cpu_warning_threshold),
            Metric::Ram | Metric::Disk => None,
        }
    }

    /// Card contents for `metric` from the latest published sample.
    fn metric_visual(&self, metric: Metric) -> MetricVisual {
        metric::render(
            metric.title(),
            metric.of_sample(self.poller.feed().current()),
            self.threshold(metric),
            &MetricStyle::new(metric.accent()),
        )
    }

    // ─── MAIN VIEW ──────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let pal = self.theme.palette;

        let mut body = Column::new()
            .spacing(24)
            .padding(32)
            .max_width(1400.0)
            .push(self.view_header());

        if self.theme_menu_open {
            body = body.push(self.view_theme_menu());
        }

        let cards = Row::with_children(
            Metric::ALL
                .iter()
                .map(|&m| metric::view(&self.metric_visual(m), m.badge(), self.theme)),
        )
        .spacing(24);
        body = body.push(cards);

        let feed = self.poller.feed();
        let charts = Row::with_children(self.panels.iter().map(|panel| {
            let metric = panel.metric();
            panel.view(feed, self.theme, move |mode| Message::SelectView(metric, mode))
        }))
        .spacing(24);
        body = body.push(charts);

        if !feed.is_live() {
            body = body.push(self.view_banner());
        }

        let page = container(body).width(Length::Fill).center_x(Length::Fill);

        container(scrollable(page))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_: &iced::Theme| container::Style {
                background: Some(Background::Color(pal.background)),
                text_color: Some(pal.text),
                ..Default::default()
            })
            .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let pal = self.theme.palette;

        let heading = column![
            text("System Resource Monitor").size(30).color(pal.text),
            text("Real-time performance metrics").size(13).color(pal.text_secondary),
        ]
        .spacing(4);

        let theme_button = surface_button(
            text(format!("Theme: {}", self.theme.label)).size(13),
            self.theme,
            self.theme_menu_open,
        )
        .on_press(Message::ToggleThemeMenu);

        let pause_button = surface_button(
            text(if self.poller.is_running() { "Pause" } else { "Resume" }).size(13),
            self.theme,
            false,
        )
        .on_press(Message::TogglePolling);

        row![
            heading,
            Space::with_width(Length::Fill),
            theme_button,
            pause_button,
            status_pill(self.poller.feed().is_live(), self.theme),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
    }

    fn view_theme_menu(&self) -> Element<'_, Message> {
        let pal = self.theme.palette;
        let groups = ThemeKind::ALL.iter().map(|&kind| {
            let entries = theme::themes_of(kind).map(|t| {
                surface_button(text(t.label).size(13), self.theme, t.id == self.theme.id)
                    .width(Length::Fill)
                    .on_press(Message::SelectTheme(t.id))
                    .into()
            });
            column![
                text(kind.group_label().to_uppercase()).size(11).color(pal.text_secondary),
                Column::with_children(entries).spacing(4),
            ]
            .spacing(8)
            .width(Length::Fixed(200.0))
            .into()
        });
        metric::card(Row::with_children(groups).spacing(24).into(), self.theme)
    }

    fn view_banner(&self) -> Element<'_, Message> {
        let base = self.api.base_url();
        let origin = base.strip_suffix("/api").unwrap_or(base);
        let c = theme::SIMULATED;
        container(
            column![
                text("Simulation Mode Active").size(14).color(c),
                text(format!(
                    "Could not connect to the backend at {origin}. Showing simulated data. \
                     Start the Python stats server (server.py) to see real metrics."
                ))
                .size(13)
                .color(self.theme.palette.text),
            ]
            .spacing(4),
        )
        .width(Length::Fill)
        .padding(16)
        .style(move |_: &iced::Theme| container::Style {
            background: Some(Background::Color(Color { a: 0.1, ..c })),
            border: Border { color: Color { a: 0.3, ..c }, width: 1.0, radius: 10.0.into() },
            ..Default::default()
        })
        .into()
    }
}

// ─── HELPER FUNCTIONS ────────────────────────────────────────────

fn status_pill<'a>(live: bool, theme: &theme::Theme) -> Element<'a, Message> {
    let (label, c) = if live { ("Online", theme::ONLINE) } else { ("Simulated", theme::SIMULATED) };
    let dot = container(Space::new(8, 8)).style(move |_: &iced::Theme| container::Style {
        background: Some(Background::Color(c)),
        border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 4.0.into() },
        ..Default::default()
    });
    let border_c = theme.palette.border;
    let card = theme.palette.card;
    container(row![dot, text(label).size(13).color(c)].spacing(8).align_y(Alignment::Center))
        .padding([6, 14])
        .style(move |_: &iced::Theme| container::Style {
            background: Some(Background::Color(card)),
            border: Border { color: border_c, width: 1.0, radius: 16.0.into() },
            ..Default::default()
        })
        .into()
}

/// Button drawn in the theme's card surface, highlighted when `active`.
fn surface_button<'a>(
    content: impl Into<Element<'a, Message>>,
    theme: &theme::Theme,
    active: bool,
) -> button::Button<'a, Message> {
    let pal = theme.palette;
    button(content)
        .padding([8, 14])
        .style(move |_: &iced::Theme, status| {
            let (bg, fg) = if active {
                (theme::SELECTION, Color::WHITE)
            } else {
                match status {
                    button::Status::Hovered | button::Status::Pressed => (pal.border, pal.text),
                    _ => (pal.card, pal.text),
                }
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: fg,
                border: Border { color: pal.border, width: 1.0, radius: 8.0.into() },
                ..Default::default()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Period, StatsSample};
    use crate::test_support::{serve, Reply};
    use crate::theme::Status;

    fn dashboard(base: &str) -> Dashboard {
        Dashboard::build(Config { api_base_url: base.to_string(), ..Config::default() })
    }

    fn unreachable_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/api")
    }

    async fn run_cycle(d: &mut Dashboard) {
        let ticket = (if d.poller.is_running() { d.poller.begin_cycle() } else { d.poller.start() })
            .expect("cycle opened");
        let outcome = d.api.fetch_current_stats().await;
        let _ = d.update(Message::StatsFetched(ticket, outcome));
    }

    #[tokio::test]
    async fn test_three_live_cycles_fill_cards_and_window() {
        let (base, seen) = serve(Reply::ok(r#"{"cpu":45,"ram":60,"disk":70,"timestamp":1000}"#)).await;
        let mut d = dashboard(&base);
        for _ in 0..3 {
            run_cycle(&mut d).await;
        }

        assert_eq!(seen.lock().unwrap().len(), 3);
        let feed = d.poller.feed();
        assert_eq!(feed.len(), 3);
        assert!(feed.is_live());
        assert!(feed.points().all(|p| p.cpu == 45.0 && p.ram == 60.0 && p.disk == 70.0));

        let cpu = d.metric_visual(Metric::Cpu);
        assert_eq!(cpu.label, "45%");
        assert_eq!(cpu.status, Status::Normal);
        assert_eq!(d.metric_visual(Metric::Ram).label, "60%");
        assert_eq!(d.metric_visual(Metric::Disk).label, "70%");
    }

    #[tokio::test]
    async fn test_unreachable_backend_shows_simulated_data() {
        let mut d = dashboard(&unreachable_base());
        run_cycle(&mut d).await;

        let feed = d.poller.feed();
        assert!(!feed.is_live());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.current().disk, 55.0);
    }

    #[tokio::test]
    async fn test_cpu_warning_follows_configured_threshold() {
        let (base, _) = serve(Reply::ok(r#"{"cpu":85,"ram":95,"disk":99,"timestamp":1}"#)).await;
        let mut d = dashboard(&base);
        run_cycle(&mut d).await;

        assert_eq!(d.metric_visual(Metric::Cpu).status, Status::Warning);
        // RAM and Disk carry no threshold.
        assert_eq!(d.metric_visual(Metric::Ram).status, Status::Normal);
        assert_eq!(d.metric_visual(Metric::Disk).status, Status::Normal);
    }

    fn outcome(cpu: f64) -> StatsOutcome {
        StatsOutcome { sample: StatsSample { cpu, ram: 50.0, disk: 55.0, timestamp: 0.0 }, live: true }
    }

    #[test]
    fn test_new_dashboard_polls_without_waiting_for_a_tick() {
        let (mut d, _first_fetch) = Dashboard::new(Config::default());
        assert!(d.poller.is_running());
        let first = d.poller.in_flight().expect("first cycle opened at startup");

        // Still in flight: the tick is skipped rather than overlapping.
        let _ = d.update(Message::Tick);
        assert_eq!(d.poller.in_flight(), Some(first));

        let _ = d.update(Message::StatsFetched(first, outcome(33.0)));
        assert_eq!(d.poller.in_flight(), None);
        assert_eq!(d.poller.completed_cycles(), 1);
        assert_eq!(d.metric_visual(Metric::Cpu).label, "33%");
    }

    #[test]
    fn test_tick_opens_next_cycle_after_completion() {
        let (mut d, _first_fetch) = Dashboard::new(Config::default());
        let first = d.poller.in_flight().unwrap();
        let _ = d.update(Message::StatsFetched(first, outcome(10.0)));

        let _ = d.update(Message::Tick);
        let second = d.poller.in_flight().expect("tick opens a cycle");
        assert_ne!(second, first);

        let _ = d.update(Message::StatsFetched(second, outcome(20.0)));
        assert_eq!(d.poller.completed_cycles(), 2);
        let cpus: Vec<f64> = d.poller.feed().points().map(|p| p.cpu).collect();
        assert_eq!(cpus, vec![10.0, 20.0]);
    }

    #[test]
    fn test_theme_selection_is_idempotent() {
        let mut d = dashboard("http://localhost:5000/api");
        assert_eq!(d.theme.id, theme::default_theme().id);

        let _ = d.update(Message::ToggleThemeMenu);
        assert!(d.theme_menu_open);
        let _ = d.update(Message::SelectTheme("sakura"));
        let palette = d.theme.palette;
        let cards: Vec<MetricVisual> = Metric::ALL.iter().map(|&m| d.metric_visual(m)).collect();

        let _ = d.update(Message::SelectTheme("sakura"));
        assert_eq!(d.theme.id, "sakura");
        assert_eq!(d.theme.palette, palette);
        assert_eq!(d.theme(), iced::Theme::Light);
        let again: Vec<MetricVisual> = Metric::ALL.iter().map(|&m| d.metric_visual(m)).collect();
        assert_eq!(again, cards);
        assert!(!d.theme_menu_open);

        let _ = d.update(Message::SelectTheme("no-such-theme"));
        assert_eq!(d.theme.id, "sakura");
    }

    #[test]
    fn test_pause_discards_in_flight_result() {
        let mut d = dashboard("http://localhost:5000/api");
        let ticket = d.poller.start().unwrap();
        let _ = d.update(Message::TogglePolling);
        assert!(!d.poller.is_running());

        let outcome = StatsOutcome {
            sample: StatsSample { cpu: 12.0, ram: 0.0, disk: 0.0, timestamp: 0.0 },
            live: true,
        };
        let _ = d.update(Message::StatsFetched(ticket, outcome));
        assert_eq!(d.poller.feed().len(), 0);
        // Ticks arriving after the pause do nothing.
        let _ = d.update(Message::Tick);
        assert_eq!(d.poller.completed_cycles(), 0);

        let _ = d.update(Message::TogglePolling);
        assert!(d.poller.is_running());
    }

    #[test]
    fn test_history_response_reaches_only_its_panel() {
        let mut d = dashboard("http://localhost:5000/api");
        let _ = d.update(Message::SelectView(Metric::Ram, ViewMode::Week));
        assert_eq!(d.panels[1].mode(), ViewMode::Week);
        assert!(d.panels[1].is_loading());
        assert_eq!(d.panels[0].mode(), ViewMode::Live);

        let request = HistoryRequest { metric: Metric::Ram, period: Period::Week, generation: 1 };
        let points = vec![HistoryPoint { time: "Mon".into(), cpu: 1.0, ram: 2.0, disk: 3.0 }];
        let _ = d.update(Message::HistoryFetched(request, points.clone()));
        assert_eq!(d.panels[1].series(), points.as_slice());
        assert!(d.panels[0].series().is_empty());
        assert!(d.panels[2].series().is_empty());
    }
}
