use iced::Color;

// ─── THEME CATALOG ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub const ALL: &[ThemeKind] = &[ThemeKind::Dark, ThemeKind::Light];

    pub fn group_label(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark Themes",
            ThemeKind::Light => "Light Themes",
        }
    }

    /// Track behind progress bars and the view-mode toggle.
    pub fn track(&self) -> Color {
        match self {
            ThemeKind::Dark => hex(0x37, 0x41, 0x51),
            ThemeKind::Light => hex(0xe5, 0xe7, 0xeb),
        }
    }

    /// Color for de-emphasized axis text.
    pub fn axis(&self) -> Color {
        hex(0x9c, 0xa3, 0xaf)
    }
}

/// All surface colors a theme defines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub card: Color,
    pub border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub chart_grid: Color,
    pub tooltip_bg: Color,
    pub tooltip_text: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ThemeKind,
    pub palette: Palette,
}

impl Theme {
    pub fn is_light(&self) -> bool {
        self.kind == ThemeKind::Light
    }

    /// Base iced theme so built-in widgets match the palette's brightness.
    pub fn iced_theme(&self) -> iced::Theme {
        if self.is_light() { iced::Theme::Light } else { iced::Theme::Dark }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme id {0:?}")]
pub struct UnknownTheme(pub String);

pub static THEMES: [Theme; 8] = [
    // ── Dark ──
    Theme {
        id: "dark-gold",
        label: "Dark Gold",
        kind: ThemeKind::Dark,
        palette: Palette {
            background:     hex(0x0a, 0x0a, 0x0a),
            card:           hex(0x17, 0x17, 0x17),
            border:         hexa(0x71, 0x3f, 0x12, 0.5),
            text:           hex(0xfe, 0xfc, 0xe8),
            text_secondary: hex(0xca, 0x8a, 0x04),
            chart_grid:     hex(0x45, 0x1a, 0x03),
            tooltip_bg:     hex(0x17, 0x17, 0x17),
            tooltip_text:   hex(0xfe, 0xfc, 0xe8),
        },
    },
    Theme {
        id: "deep-ocean",
        label: "Deep Ocean",
        kind: ThemeKind::Dark,
        palette: Palette {
            background:     hex(0x0f, 0x17, 0x2a),
            card:           hex(0x1e, 0x29, 0x3b),
            border:         hex(0x33, 0x41, 0x55),
            text:           hex(0xf1, 0xf5, 0xf9),
            text_secondary: hex(0x94, 0xa3, 0xb8),
            chart_grid:     hex(0x33, 0x41, 0x55),
            tooltip_bg:     hex(0x1e, 0x29, 0x3b),
            tooltip_text:   hex(0xf1, 0xf5, 0xf9),
        },
    },
    Theme {
        id: "forest-night",
        label: "Forest Night",
        kind: ThemeKind::Dark,
        palette: Palette {
            background:     hex(0x05, 0x2e, 0x16),
            card:           hex(0x14, 0x53, 0x2d),
            border:         hex(0x16, 0x65, 0x34),
            text:           hex(0xf0, 0xfd, 0xf4),
            text_secondary: hex(0x4a, 0xde, 0x80),
            chart_grid:     hex(0x14, 0x53, 0x2d),
            tooltip_bg:     hex(0x06, 0x4e, 0x3b),
            tooltip_text:   hex(0xec, 0xfd, 0xf5),
        },
    },
    Theme {
        id: "cyberpunk",
        label: "Cyberpunk",
        kind: ThemeKind::Dark,
        palette: Palette {
            background:     hex(0x09, 0x09, 0x0b),
            card:           hex(0x00, 0x00, 0x00),
            border:         hexa(0xec, 0x48, 0x99, 0.3),
            text:           hex(0xf4, 0xf4, 0xf5),
            text_secondary: hex(0xa1, 0xa1, 0xaa),
            chart_grid:     hex(0x27, 0x27, 0x2a),
            tooltip_bg:     hex(0x00, 0x00, 0x00),
            tooltip_text:   hex(0xe4, 0xe4, 0xe7),
        },
    },
    Theme {
        id: "crimson-night",
        label: "Crimson Night",
        kind: ThemeKind::Dark,
        palette: Palette {
            background:     hex(0x45, 0x0a, 0x0a),
            card:           hex(0x45, 0x0a, 0x0a),
            border:         hex(0x7f, 0x1d, 0x1d),
            text:           hex(0xfe, 0xf2, 0xf2),
            text_secondary: hex(0xf8, 0x71, 0x71),
            chart_grid:     hex(0x7f, 0x1d, 0x1d),
            tooltip_bg:     hex(0x45, 0x0a, 0x0a),
            tooltip_text:   hex(0xfe, 0xf2, 0xf2),
        },
    },
    // ── Light ──
    Theme {
        id: "light-default",
        label: "Classic Light",
        kind: ThemeKind::Light,
        palette: Palette {
            background:     hex(0xf3, 0xf4, 0xf6),
            card:           hex(0xff, 0xff, 0xff),
            border:         hex(0xe5, 0xe7, 0xeb),
            text:           hex(0x11, 0x18, 0x27),
            text_secondary: hex(0x6b, 0x72, 0x80),
            chart_grid:     hex(0xe5, 0xe7, 0xeb),
            tooltip_bg:     hex(0xff, 0xff, 0xff),
            tooltip_text:   hex(0x11, 0x18, 0x27),
        },
    },
    Theme {
        id: "sakura",
        label: "Sakura",
        kind: ThemeKind::Light,
        palette: Palette {
            background:     hex(0xfd, 0xf2, 0xf8),
            card:           hex(0xff, 0xff, 0xff),
            border:         hex(0xfb, 0xcf, 0xe8),
            text:           hex(0x50, 0x07, 0x24),
            text_secondary: hex(0xec, 0x48, 0x99),
            chart_grid:     hex(0xfb, 0xcf, 0xe8),
            tooltip_bg:     hex(0xff, 0xf1, 0xf2),
            tooltip_text:   hex(0x83, 0x18, 0x43),
        },
    },
    Theme {
        id: "azure-day",
        label: "Azure Day",
        kind: ThemeKind::Light,
        palette: Palette {
            background:     hex(0xef, 0xf6, 0xff),
            card:           hex(0xff, 0xff, 0xff),
            border:         hex(0xbf, 0xdb, 0xfe),
            text:           hex(0x1e, 0x3a, 0x8a),
            text_secondary: hex(0x3b, 0x82, 0xf6),
            chart_grid:     hex(0xbf, 0xdb, 0xfe),
            tooltip_bg:     hex(0xef, 0xf6, 0xff),
            tooltip_text:   hex(0x17, 0x25, 0x54),
        },
    },
];

pub fn list_themes() -> &'static [Theme] {
    &THEMES
}

pub fn themes_of(kind: ThemeKind) -> impl Iterator<Item = &'static Theme> {
    list_themes().iter().filter(move |t| t.kind == kind)
}

pub fn select_theme(id: &str) -> Result<&'static Theme, UnknownTheme> {
    THEMES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| UnknownTheme(id.to_string()))
}

pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

// ─── STATUS COLORS ──────────────────────────────────────────────

pub const ONLINE: Color = hex(0x22, 0xc5, 0x5e);
pub const SIMULATED: Color = hex(0xf9, 0x73, 0x16);
pub const WARNING: Color = hex(0xef, 0x44, 0x44);
/// Active tab / selected entry highlight.
pub const SELECTION: Color = hex(0x25, 0x63, 0xeb);

// ─── METRIC STYLES ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Purple,
    Emerald,
}

impl Accent {
    pub fn color(&self) -> Color {
        match self {
            Accent::Blue => hex(0x3b, 0x82, 0xf6),
            Accent::Purple => hex(0xa8, 0x55, 0xf7),
            Accent::Emerald => hex(0x10, 0xb9, 0x81),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Text,
    /// Filled part of the progress bar.
    Background,
    IconBackground,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusStyle {
    pub text: Color,
    pub background: Color,
    pub icon_background: Color,
}

impl StatusStyle {
    fn from_color(c: Color) -> Self {
        Self {
            text: c,
            background: c,
            icon_background: Color { a: 0.2, ..c },
        }
    }
}

/// Concrete colors for a metric card, per status and role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStyle {
    pub normal: StatusStyle,
    pub warning: StatusStyle,
}

impl MetricStyle {
    pub fn new(accent: Accent) -> Self {
        Self {
            normal: StatusStyle::from_color(accent.color()),
            warning: StatusStyle::from_color(WARNING),
        }
    }

    pub fn status(&self, status: Status) -> &StatusStyle {
        match status {
            Status::Normal => &self.normal,
            Status::Warning => &self.warning,
        }
    }

    pub fn get(&self, status: Status, role: Role) -> Color {
        let s = self.status(status);
        match role {
            Role::Text => s.text,
            Role::Background => s.background,
            Role::IconBackground => s.icon_background,
        }
    }
}

const fn hex(r: u8, g: u8, b: u8) -> Color {
    hexa(r, g, b, 1.0)
}

const fn hexa(r: u8, g: u8, b: u8, a: f32) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a,
    }
}
