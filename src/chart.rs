use iced::mouse;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

/// The y-axis always spans 0–100 percent.
const Y_MAX: f32 = 100.0;
const PAD_LEFT: f32 = 36.0;
const PAD_RIGHT: f32 = 10.0;
const PAD_TOP: f32 = 8.0;
const PAD_BOTTOM: f32 = 24.0;
const MAX_X_LABELS: usize = 6;

/// Hover state: stores the snapped data-point index (not raw pixel).
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    pub hover_idx: Option<usize>,
}

/// Colors the chart takes from the active theme.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub grid: Color,
    pub axis: Color,
    pub tooltip_bg: Color,
    pub tooltip_text: Color,
}

/// A single-series percentage line chart drawn via iced Canvas.
#[derive(Debug, Clone)]
pub struct LineChart {
    /// One x-axis label per point, in display order.
    pub labels: Vec<String>,
    pub values: Vec<f32>,
    pub color: Color,
    /// Draw a marker on every point.
    pub show_dots: bool,
    pub colors: ChartColors,
}

impl<Message: 'static> canvas::Program<Message> for LineChart {
    type State = ChartState;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let chart_w = bounds.width - PAD_LEFT - PAD_RIGHT;
        let n = self.values.len();

        let new_idx = match &event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => cursor
                .position_in(bounds)
                .and_then(|pos| nearest_index(pos.x - PAD_LEFT, chart_w, n)),
            Event::Mouse(mouse::Event::CursorLeft) => None,
            _ => return (canvas::event::Status::Ignored, None),
        };

        if new_idx != state.hover_idx {
            state.hover_idx = new_idx;
        }
        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let c = &self.colors;

        let chart_w = bounds.width - PAD_LEFT - PAD_RIGHT;
        let chart_h = bounds.height - PAD_TOP - PAD_BOTTOM;
        if chart_w <= 0.0 || chart_h <= 0.0 {
            return vec![frame.into_geometry()];
        }

        // Horizontal grid + y labels every 25%
        for tick in (0..=4).map(|i| i as f32 * 25.0) {
            let y = y_at(tick, chart_h);
            let grid = Path::line(Point::new(PAD_LEFT, y), Point::new(PAD_LEFT + chart_w, y));
            frame.stroke(&grid, Stroke::default().with_color(c.grid).with_width(1.0));

            let mut label = Text::from(format!("{tick:.0}"));
            label.position = Point::new(PAD_LEFT - 6.0, y);
            label.color = c.axis;
            label.size = 11.0.into();
            label.font = iced::Font::MONOSPACE;
            label.horizontal_alignment = iced::alignment::Horizontal::Right;
            label.vertical_alignment = iced::alignment::Vertical::Center;
            frame.fill_text(label);
        }

        let n = self.values.len();

        // X labels, thinned out so they do not collide
        for idx in label_indices(n, MAX_X_LABELS) {
            let Some(label_str) = self.labels.get(idx) else { continue };
            let mut label = Text::from(label_str.clone());
            label.position = Point::new(x_at(idx, n, chart_w), PAD_TOP + chart_h + 6.0);
            label.color = c.axis;
            label.size = 11.0.into();
            label.horizontal_alignment = iced::alignment::Horizontal::Center;
            frame.fill_text(label);
        }

        if n == 0 {
            return vec![frame.into_geometry()];
        }

        let points: Vec<Point> = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| Point::new(x_at(i, n, chart_w), y_at(v, chart_h)))
            .collect();

        if points.len() >= 2 {
            let mut builder = canvas::path::Builder::new();
            builder.move_to(points[0]);
            for &p in &points[1..] {
                builder.line_to(p);
            }
            let path = builder.build();
            // Glow pass: thicker, semi-transparent
            let glow_color = Color { a: 0.2, ..self.color };
            frame.stroke(&path, Stroke::default().with_color(glow_color).with_width(6.0));
            frame.stroke(&path, Stroke::default().with_color(self.color).with_width(3.0));
        }

        if self.show_dots || points.len() == 1 {
            for &p in &points {
                frame.fill(&Path::circle(p, 3.5), self.color);
                frame.stroke(
                    &Path::circle(p, 3.5),
                    Stroke::default().with_color(c.tooltip_bg).with_width(1.5),
                );
            }
        }

        if let Some(idx) = state.hover_idx.filter(|&i| i < n) {
            let p = points[idx];

            let crosshair = Path::line(Point::new(p.x, PAD_TOP), Point::new(p.x, PAD_TOP + chart_h));
            frame.stroke(
                &crosshair,
                Stroke::default().with_color(Color { a: 0.35, ..c.axis }).with_width(1.0),
            );

            // Active dot
            frame.fill(&Path::circle(p, 6.0), self.color);
            frame.stroke(&Path::circle(p, 6.0), Stroke::default().with_color(c.tooltip_bg).with_width(2.0));

            let label = self.labels.get(idx).map(String::as_str).unwrap_or_default();
            let value = format!("{}%", self.values[idx]);
            let text_w = label.len().max(value.len()) as f32 * 7.0 + 16.0;
            let box_h = 38.0;
            let tx = if p.x + 12.0 + text_w > PAD_LEFT + chart_w { p.x - 12.0 - text_w } else { p.x + 12.0 };
            let ty = (p.y - box_h / 2.0).min(PAD_TOP + chart_h - box_h).max(PAD_TOP);

            let box_path = Path::rectangle(Point::new(tx, ty), Size::new(text_w, box_h));
            frame.fill(&box_path, c.tooltip_bg);
            frame.stroke(&box_path, Stroke::default().with_color(c.grid).with_width(1.0));

            let mut title = Text::from(label.to_string());
            title.position = Point::new(tx + 8.0, ty + 4.0);
            title.color = c.tooltip_text;
            title.size = 11.0.into();
            frame.fill_text(title);

            let mut val = Text::from(value);
            val.position = Point::new(tx + 8.0, ty + 19.0);
            val.color = self.color;
            val.size = 12.0.into();
            val.font = iced::Font::MONOSPACE;
            frame.fill_text(val);
        }

        vec![frame.into_geometry()]
    }
}

/// Horizontal position of point `i` of `n` inside a plot `chart_w` wide.
fn x_at(i: usize, n: usize, chart_w: f32) -> f32 {
    if n <= 1 {
        PAD_LEFT + chart_w / 2.0
    } else {
        PAD_LEFT + (i as f32 / (n - 1) as f32) * chart_w
    }
}

/// Vertical position of `value` on the fixed 0–100 axis; out-of-range
/// values pin to the plot edge.
fn y_at(value: f32, chart_h: f32) -> f32 {
    let normalized = (value / Y_MAX).clamp(0.0, 1.0);
    PAD_TOP + chart_h * (1.0 - normalized)
}

/// Index of the data point nearest to `x` (relative to the plot's left edge).
fn nearest_index(x: f32, chart_w: f32, n: usize) -> Option<usize> {
    if n == 0 || chart_w <= 0.0 || x < 0.0 || x > chart_w {
        return None;
    }
    if n == 1 {
        return Some(0);
    }
    let idx = (x / chart_w * (n - 1) as f32).round() as usize;
    Some(idx.min(n - 1))
}

/// Evenly spaced label indices, always including the first and last point.
fn label_indices(n: usize, max: usize) -> Vec<usize> {
    if n <= max {
        return (0..n).collect();
    }
    let step = n.div_ceil(max);
    let mut idx: Vec<usize> = (0..n).step_by(step).collect();
    if idx.last() != Some(&(n - 1)) {
        // Drop a neighbour that would overlap the final label.
        if idx.last().is_some_and(|&l| n - 1 - l < step / 2 + 1) {
            idx.pop();
        }
        idx.push(n - 1);
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_axis_is_fixed() {
        let h = 200.0;
        assert_eq!(y_at(100.0, h), PAD_TOP);
        assert_eq!(y_at(0.0, h), PAD_TOP + h);
        assert_eq!(y_at(50.0, h), PAD_TOP + 100.0);
        assert_eq!(y_at(150.0, h), PAD_TOP);
        assert_eq!(y_at(-5.0, h), PAD_TOP + h);
    }

    #[test]
    fn test_x_positions() {
        assert_eq!(x_at(0, 5, 400.0), PAD_LEFT);
        assert_eq!(x_at(4, 5, 400.0), PAD_LEFT + 400.0);
        assert_eq!(x_at(0, 1, 400.0), PAD_LEFT + 200.0);
    }

    #[test]
    fn test_nearest_index() {
        assert_eq!(nearest_index(0.0, 100.0, 0), None);
        assert_eq!(nearest_index(-1.0, 100.0, 5), None);
        assert_eq!(nearest_index(101.0, 100.0, 5), None);
        assert_eq!(nearest_index(0.0, 100.0, 5), Some(0));
        assert_eq!(nearest_index(60.0, 100.0, 5), Some(2));
        assert_eq!(nearest_index(100.0, 100.0, 5), Some(4));
        assert_eq!(nearest_index(10.0, 100.0, 1), Some(0));
    }

    #[test]
    fn test_label_indices() {
        assert_eq!(label_indices(0, 6), Vec::<usize>::new());
        assert_eq!(label_indices(7, 7), vec![0, 1, 2, 3, 4, 5, 6]);
        let idx = label_indices(24, 6);
        assert_eq!(idx.first(), Some(&0));
        assert_eq!(idx.last(), Some(&23));
        assert!(idx.len() <= 7);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        let idx = label_indices(20, 6);
        assert_eq!(idx.last(), Some(&19));
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }
}
