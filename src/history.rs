use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Alignment, Background, Border, Color, Element, Length};

use crate::api::{HistoryPoint, Period};
use crate::chart::{ChartColors, LineChart};
use crate::metric::{self, Metric};
use crate::poller::LiveFeed;
use crate::theme::{self, Theme};

const CHART_HEIGHT: f32 = 250.0;

/// Which series a history panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Live,
    Day,
    Week,
}

impl ViewMode {
    pub const ALL: &[ViewMode] = &[ViewMode::Live, ViewMode::Day, ViewMode::Week];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Live => "Live",
            ViewMode::Day => "24h",
            ViewMode::Week => "7d",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            ViewMode::Live => "Real-time updates",
            ViewMode::Day => "Last 24 Hours",
            ViewMode::Week => "Last 7 Days",
        }
    }

    /// Backend period for the non-live modes.
    pub fn period(&self) -> Option<Period> {
        match self {
            ViewMode::Live => None,
            ViewMode::Day => Some(Period::Day),
            ViewMode::Week => Some(Period::Week),
        }
    }
}

/// A history fetch the panel wants performed. The generation ties the
/// eventual response back to the toggle that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub metric: Metric,
    pub period: Period,
    pub generation: u64,
}

/// Per-metric chart with its own live / 24h / 7d toggle.
#[derive(Debug, Clone)]
pub struct HistoryPanel {
    metric: Metric,
    mode: ViewMode,
    series: Vec<HistoryPoint>,
    generation: u64,
    loading: bool,
}

impl HistoryPanel {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            mode: ViewMode::Live,
            series: Vec::new(),
            generation: 0,
            loading: false,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last fetched non-live series.
    pub fn series(&self) -> &[HistoryPoint] {
        &self.series
    }

    /// Switch view mode. Every switch into a non-live mode, including
    /// re-selecting the current one, asks for a fresh fetch; any response
    /// still pending from an earlier switch becomes stale.
    pub fn select_mode(&mut self, mode: ViewMode) -> Option<HistoryRequest> {
        self.mode = mode;
        self.generation += 1;
        match mode.period() {
            Some(period) => {
                self.series.clear();
                self.loading = true;
                tracing::debug!(metric = ?self.metric, %period, generation = self.generation, "requesting history");
                Some(HistoryRequest { metric: self.metric, period, generation: self.generation })
            }
            None => {
                self.loading = false;
                None
            }
        }
    }

    /// Install a fetched series, replacing whatever was there. Returns false
    /// when the response belongs to a superseded request.
    pub fn apply(&mut self, generation: u64, points: Vec<HistoryPoint>) -> bool {
        if generation != self.generation || self.mode.period().is_none() {
            tracing::debug!(metric = ?self.metric, generation, current = self.generation, "dropping stale history response");
            return false;
        }
        self.series = points;
        self.loading = false;
        true
    }

    /// Points to draw: the shared live window in live mode, the fetched series otherwise.
    pub fn visible_points<'a>(&'a self, feed: &'a LiveFeed) -> Vec<&'a HistoryPoint> {
        match self.mode {
            ViewMode::Live => feed.points().collect(),
            ViewMode::Day | ViewMode::Week => self.series().iter().collect(),
        }
    }

    pub fn chart(&self, feed: &LiveFeed, theme: &Theme) -> LineChart {
        let points = self.visible_points(feed);
        LineChart {
            labels: points.iter().map(|p| p.time.clone()).collect(),
            values: points.iter().map(|p| self.metric.of_point(p) as f32).collect(),
            color: self.metric.accent().color(),
            show_dots: self.mode != ViewMode::Live,
            colors: ChartColors {
                grid: theme.palette.chart_grid,
                axis: theme.kind.axis(),
                tooltip_bg: theme.palette.tooltip_bg,
                tooltip_text: theme.palette.tooltip_text,
            },
        }
    }

    pub fn view<'a, Message: Clone + 'static>(
        &self,
        feed: &LiveFeed,
        theme: &Theme,
        on_select: impl Fn(ViewMode) -> Message,
    ) -> Element<'a, Message> {
        let pal = theme.palette;

        let heading = column![
            text(format!("{} HISTORY", self.metric.title().to_uppercase()))
                .size(11)
                .color(pal.text_secondary),
            text(if self.is_loading() { "Loading…" } else { self.mode.subtitle() })
                .size(11)
                .color(Color { a: 0.7, ..pal.text }),
        ]
        .spacing(2);

        let toggles = Row::with_children(
            ViewMode::ALL
                .iter()
                .map(|&mode| mode_button(mode, mode == self.mode, theme, on_select(mode))),
        )
        .spacing(2);
        let track = theme.kind.track();
        let toggle_group = container(toggles)
            .padding(3)
            .style(move |_: &iced::Theme| container::Style {
                background: Some(Background::Color(Color { a: 0.6, ..track })),
                border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 8.0.into() },
                ..Default::default()
            });

        let header = row![heading, Space::with_width(Length::Fill), toggle_group]
            .align_y(Alignment::Center);

        let chart = Canvas::new(self.chart(feed, theme))
            .width(Length::Fill)
            .height(Length::Fixed(CHART_HEIGHT));

        metric::card(column![header, chart].spacing(16).into(), theme)
    }
}

fn mode_button<'a, Message: Clone + 'a>(
    mode: ViewMode,
    is_active: bool,
    theme: &Theme,
    on_press: Message,
) -> Element<'a, Message> {
    let idle_text = theme.palette.text_secondary;
    let hover_text = theme.palette.text;
    let hover_bg = if theme.is_light() {
        Color::from_rgba(0.0, 0.0, 0.0, 0.05)
    } else {
        Color::from_rgba(1.0, 1.0, 1.0, 0.05)
    };
    button(text(mode.label()).size(12))
        .on_press(on_press)
        .padding([4, 12])
        .style(move |_: &iced::Theme, status| {
            let (bg, fg) = if is_active {
                (theme::SELECTION, Color::WHITE)
            } else {
                match status {
                    button::Status::Hovered | button::Status::Pressed => (hover_bg, hover_text),
                    _ => (Color::TRANSPARENT, idle_text),
                }
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: fg,
                border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 6.0.into() },
                ..Default::default()
            }
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{StatsOutcome, StatsSample};
    use crate::poller::LivePoller;
    use crate::simulate;
    use chrono::{Local, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn point(label: &str, v: f64) -> HistoryPoint {
        HistoryPoint { time: label.into(), cpu: v, ram: v + 1.0, disk: v + 2.0 }
    }

    #[test]
    fn test_defaults_to_live() {
        let panel = HistoryPanel::new(Metric::Cpu);
        assert_eq!(panel.mode(), ViewMode::Live);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_switch_to_day_requests_one_fetch() {
        let mut panel = HistoryPanel::new(Metric::Ram);
        let req = panel.select_mode(ViewMode::Day).expect("fetch requested");
        assert_eq!(req.period, Period::Day);
        assert_eq!(req.metric, Metric::Ram);
        assert!(panel.is_loading());

        let now = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let fallback = simulate::history(req.period, &now, &mut StdRng::seed_from_u64(3));
        assert!(panel.apply(req.generation, fallback.clone()));
        assert_eq!(panel.series(), fallback.as_slice());
        assert_eq!(panel.series().len(), 24);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_reselecting_same_mode_refetches_and_replaces() {
        let mut panel = HistoryPanel::new(Metric::Cpu);
        let first = panel.select_mode(ViewMode::Week).unwrap();
        panel.apply(first.generation, vec![point("Mon", 1.0), point("Tue", 2.0)]);

        let second = panel.select_mode(ViewMode::Week).expect("refetch on re-select");
        assert_ne!(first.generation, second.generation);
        assert!(panel.apply(second.generation, vec![point("Wed", 9.0)]));
        assert_eq!(panel.series(), [point("Wed", 9.0)].as_slice());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut panel = HistoryPanel::new(Metric::Disk);
        let day = panel.select_mode(ViewMode::Day).unwrap();
        let week = panel.select_mode(ViewMode::Week).unwrap();

        assert!(!panel.apply(day.generation, vec![point("late", 1.0)]));
        assert!(panel.series().is_empty());
        assert!(panel.apply(week.generation, vec![point("Sun", 5.0)]));

        // Back to live: a response for the week view must not land.
        let again = panel.select_mode(ViewMode::Week).unwrap();
        assert_eq!(panel.select_mode(ViewMode::Live), None);
        assert!(!panel.apply(again.generation, vec![point("x", 0.0)]));
    }

    #[test]
    fn test_live_mode_reads_shared_window() {
        let mut poller = LivePoller::new(20);
        for (i, cpu) in [10.0, 20.0, 30.0].into_iter().enumerate() {
            let t = (if i == 0 { poller.start() } else { poller.begin_cycle() }).unwrap();
            let outcome = StatsOutcome {
                sample: StatsSample { cpu, ram: 0.0, disk: 0.0, timestamp: 0.0 },
                live: true,
            };
            poller.complete_cycle(t, outcome, Local.timestamp_opt(i as i64, 0).unwrap());
        }

        let theme = theme::default_theme();
        let mut panel = HistoryPanel::new(Metric::Cpu);
        let chart = panel.chart(poller.feed(), theme);
        assert_eq!(chart.values, vec![10.0, 20.0, 30.0]);
        assert!(!chart.show_dots);

        let req = panel.select_mode(ViewMode::Week).unwrap();
        panel.apply(req.generation, vec![point("Mon", 70.0)]);
        let chart = panel.chart(poller.feed(), theme);
        assert_eq!(chart.values, vec![70.0]);
        assert_eq!(chart.labels, vec!["Mon".to_string()]);
        assert!(chart.show_dots);
    }

    #[test]
    fn test_panels_are_independent() {
        let mut cpu = HistoryPanel::new(Metric::Cpu);
        let ram = HistoryPanel::new(Metric::Ram);
        cpu.select_mode(ViewMode::Week);
        assert_eq!(cpu.mode(), ViewMode::Week);
        assert_eq!(ram.mode(), ViewMode::Live);
    }
}
