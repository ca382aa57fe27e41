use iced::widget::{column, container, progress_bar, row, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Shadow, Vector};

use crate::api::{HistoryPoint, StatsSample};
use crate::theme::{Accent, MetricStyle, Role, Status, Theme};

/// The three tracked resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Ram,
    Disk,
}

impl Metric {
    pub const ALL: &[Metric] = &[Metric::Cpu, Metric::Ram, Metric::Disk];

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU Usage",
            Metric::Ram => "RAM Usage",
            Metric::Disk => "Disk Usage",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Ram => "RAM",
            Metric::Disk => "HDD",
        }
    }

    pub fn accent(&self) -> Accent {
        match self {
            Metric::Cpu => Accent::Blue,
            Metric::Ram => Accent::Purple,
            Metric::Disk => Accent::Emerald,
        }
    }

    pub fn of_sample(&self, s: &StatsSample) -> f64 {
        match self {
            Metric::Cpu => s.cpu,
            Metric::Ram => s.ram,
            Metric::Disk => s.disk,
        }
    }

    pub fn of_point(&self, p: &HistoryPoint) -> f64 {
        match self {
            Metric::Cpu => p.cpu,
            Metric::Ram => p.ram,
            Metric::Disk => p.disk,
        }
    }
}

/// Everything needed to draw one metric card. A pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricVisual {
    pub title: String,
    /// Raw value with a percent sign; never clamped.
    pub label: String,
    /// Bar fill in percent, clamped to 0..=100.
    pub fill: f32,
    pub status: Status,
    pub text: Color,
    pub bar: Color,
    pub icon_background: Color,
}

/// Warning applies only when a threshold is set and strictly exceeded.
pub fn is_warning(value: f64, threshold: Option<f64>) -> bool {
    threshold.is_some_and(|t| value > t)
}

pub fn render(
    title: impl Into<String>,
    value: f64,
    threshold: Option<f64>,
    style: &MetricStyle,
) -> MetricVisual {
    let status = if is_warning(value, threshold) { Status::Warning } else { Status::Normal };
    let fill = if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) as f32 };
    MetricVisual {
        title: title.into(),
        label: format!("{value}%"),
        fill,
        status,
        text: style.get(status, Role::Text),
        bar: style.get(status, Role::Background),
        icon_background: style.get(status, Role::IconBackground),
    }
}

pub fn view<'a, Message: 'a>(visual: &MetricVisual, badge: &'a str, theme: &Theme) -> Element<'a, Message> {
    let pal = theme.palette;
    let text_c = visual.text;
    let icon_bg = visual.icon_background;
    let bar_c = visual.bar;
    let track = theme.kind.track();

    let icon = container(text(badge).size(12).font(iced::Font::MONOSPACE).color(text_c))
        .padding([10, 8])
        .style(move |_: &iced::Theme| container::Style {
            background: Some(Background::Color(icon_bg)),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 8.0.into() },
            ..Default::default()
        });

    let header = row![
        column![
            text(visual.title.to_uppercase()).size(11).color(pal.text_secondary),
            text(visual.label.clone()).size(30).color(text_c),
        ]
        .spacing(4),
        Space::with_width(Length::Fill),
        icon,
    ]
    .align_y(Alignment::Start);

    let bar = progress_bar(0.0..=100.0, visual.fill)
        .height(8)
        .style(move |_: &iced::Theme| progress_bar::Style {
            background: Background::Color(track),
            bar: Background::Color(bar_c),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 4.0.into() },
        });

    card(column![header, bar].spacing(16).into(), theme)
}

/// Rounded, bordered surface in the theme's card color.
pub fn card<'a, Message: 'a>(content: Element<'a, Message>, theme: &Theme) -> Element<'a, Message> {
    let bg = theme.palette.card;
    let border_c = theme.palette.border;
    container(content)
        .width(Length::Fill)
        .padding(20)
        .style(move |_: &iced::Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border { color: border_c, width: 1.0, radius: 12.0.into() },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::WARNING;

    fn style() -> MetricStyle {
        MetricStyle::new(Accent::Blue)
    }

    #[test]
    fn test_warning_strictly_above_threshold() {
        assert!(is_warning(85.0, Some(80.0)));
        assert!(!is_warning(80.0, Some(80.0)));
        assert!(!is_warning(79.9, Some(80.0)));
        assert!(!is_warning(500.0, None));
    }

    #[test]
    fn test_warning_overrides_colors() {
        let v = render("CPU Usage", 85.0, Some(80.0), &style());
        assert_eq!(v.status, Status::Warning);
        assert_eq!(v.text, WARNING);
        assert_eq!(v.bar, WARNING);

        let v = render("CPU Usage", 80.0, Some(80.0), &style());
        assert_eq!(v.status, Status::Normal);
        assert_eq!(v.text, Accent::Blue.color());
    }

    #[test]
    fn test_label_is_raw_and_bar_is_clamped() {
        let v = render("RAM Usage", 130.5, None, &style());
        assert_eq!(v.label, "130.5%");
        assert_eq!(v.fill, 100.0);

        let v = render("RAM Usage", -4.0, None, &style());
        assert_eq!(v.label, "-4%");
        assert_eq!(v.fill, 0.0);

        let v = render("RAM Usage", 45.0, None, &style());
        assert_eq!(v.label, "45%");
        assert_eq!(v.fill, 45.0);
    }

    #[test]
    fn test_render_is_pure() {
        assert_eq!(render("Disk", 70.0, Some(90.0), &style()), render("Disk", 70.0, Some(90.0), &style()));
    }

    #[test]
    fn test_metric_accessors() {
        let s = StatsSample { cpu: 1.0, ram: 2.0, disk: 3.0, timestamp: 0.0 };
        let values: Vec<f64> = Metric::ALL.iter().map(|m| m.of_sample(&s)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(Metric::Disk.accent(), Accent::Emerald);
    }
}
