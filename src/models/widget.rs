use serde::{Deserialize, Serialize};

/// The dashboard's sensor widgets. Every widget shares one keyed toggle
/// store instead of a per-widget visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Caffeine,
    ScreenTime,
    VitaminD,
    Circadian,
    Alarms,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Caffeine,
        WidgetKind::ScreenTime,
        WidgetKind::VitaminD,
        WidgetKind::Circadian,
        WidgetKind::Alarms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Caffeine => "caffeine",
            WidgetKind::ScreenTime => "screen_time",
            WidgetKind::VitaminD => "vitamin_d",
            WidgetKind::Circadian => "circadian",
            WidgetKind::Alarms => "alarms",
        }
    }

    pub fn parse(s: &str) -> Option<WidgetKind> {
        WidgetKind::ALL.into_iter().find(|w| w.as_str() == s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetToggle {
    pub user_id: String,
    pub widget: WidgetKind,
    pub enabled: bool,
    pub updated_at: i64,
}
