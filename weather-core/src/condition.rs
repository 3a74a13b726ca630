//! Mapping of provider condition codes onto a closed set of display labels.
//!
//! Open-Meteo reports WMO interpretation codes, while keyed providers and the
//! offline table report free text. Both collapse into [`Condition`]; nothing
//! outside this module ever sees a raw upstream string.

use serde::{Serialize, Serializer};

/// Provider-specific condition identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawConditionCode {
    /// WMO weather interpretation code (Open-Meteo `weather_code`).
    Wmo(i32),
    /// Free-text condition, e.g. OpenWeather `weather[0].main`.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    MostlyClear,
    PartlyCloudy,
    Cloudy,
    Foggy,
    LightDrizzle,
    ModerateDrizzle,
    HeavyDrizzle,
    SlightRain,
    ModerateRain,
    HeavyRain,
    SlightSnow,
    ModerateSnow,
    HeavySnow,
    SnowGrains,
    SlightRainShowers,
    ModerateRainShowers,
    ViolentRainShowers,
    SlightSnowShowers,
    HeavySnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    Unknown,
}

/// Every WMO code the normalizer recognizes.
pub const WMO_CODES: &[i32] = &[
    0, 1, 2, 3, 45, 48, 51, 53, 55, 61, 63, 65, 71, 73, 75, 77, 80, 81, 82, 85, 86, 95, 96, 99,
];

/// Icon used when no keyword in [`ICONS`] matches.
pub const DEFAULT_ICON: &str = "⛅";

/// Ordered keyword table; the first keyword contained in the label wins.
const ICONS: &[(&str, &str)] = &[
    ("Clear", "☀️"),
    ("Mostly Clear", "☀️"),
    ("Partly Cloudy", "⛅"),
    ("Cloudy", "☁️"),
    ("Foggy", "🌫️"),
    ("Drizzle", "🌧️"),
    ("Rain", "🌧️"),
    ("Slight Rain", "🌧️"),
    ("Moderate Rain", "🌧️"),
    ("Heavy Rain", "⛈️"),
    ("Snow", "❄️"),
    ("Slight Snow", "❄️"),
    ("Moderate Snow", "❄️"),
    ("Heavy Snow", "❄️"),
    ("Thunderstorm", "⛈️"),
];

impl Condition {
    const ALL: &'static [Condition] = &[
        Condition::Clear,
        Condition::MostlyClear,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Foggy,
        Condition::LightDrizzle,
        Condition::ModerateDrizzle,
        Condition::HeavyDrizzle,
        Condition::SlightRain,
        Condition::ModerateRain,
        Condition::HeavyRain,
        Condition::SlightSnow,
        Condition::ModerateSnow,
        Condition::HeavySnow,
        Condition::SnowGrains,
        Condition::SlightRainShowers,
        Condition::ModerateRainShowers,
        Condition::ViolentRainShowers,
        Condition::SlightSnowShowers,
        Condition::HeavySnowShowers,
        Condition::Thunderstorm,
        Condition::ThunderstormWithHail,
        Condition::Unknown,
    ];

    /// See <https://open-meteo.com/en/docs#weathervariables>.
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MostlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Foggy,
            51 => Self::LightDrizzle,
            53 => Self::ModerateDrizzle,
            55 => Self::HeavyDrizzle,
            61 => Self::SlightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            71 => Self::SlightSnow,
            73 => Self::ModerateSnow,
            75 => Self::HeavySnow,
            77 => Self::SnowGrains,
            80 => Self::SlightRainShowers,
            81 => Self::ModerateRainShowers,
            82 => Self::ViolentRainShowers,
            85 => Self::SlightSnowShowers,
            86 => Self::HeavySnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormWithHail,
            _ => Self::Unknown,
        }
    }

    /// Interpret a free-text condition. Exact labels (any case) map to
    /// themselves; common provider vocabulary is folded onto the nearest label.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();

        if let Some(exact) = Self::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(text))
        {
            return *exact;
        }

        match text.to_lowercase().as_str() {
            "sunny" | "clear sky" => Self::Clear,
            "clouds" | "overcast" => Self::Cloudy,
            "rain" | "rainy" => Self::ModerateRain,
            "snow" | "snowy" => Self::ModerateSnow,
            "drizzle" => Self::LightDrizzle,
            "mist" | "fog" | "haze" | "smoke" => Self::Foggy,
            "thunderstorm" | "storm" => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::MostlyClear => "Mostly Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Foggy => "Foggy",
            Self::LightDrizzle => "Light Drizzle",
            Self::ModerateDrizzle => "Moderate Drizzle",
            Self::HeavyDrizzle => "Heavy Drizzle",
            Self::SlightRain => "Slight Rain",
            Self::ModerateRain => "Moderate Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::SlightSnow => "Slight Snow",
            Self::ModerateSnow => "Moderate Snow",
            Self::HeavySnow => "Heavy Snow",
            Self::SnowGrains => "Snow Grains",
            Self::SlightRainShowers => "Slight Rain Showers",
            Self::ModerateRainShowers => "Moderate Rain Showers",
            Self::ViolentRainShowers => "Violent Rain Showers",
            Self::SlightSnowShowers => "Slight Snow Showers",
            Self::HeavySnowShowers => "Heavy Snow Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with Hail",
            Self::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        icon_for_label(self.label())
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Substring match of `label` against the ordered keyword table.
pub fn icon_for_label(label: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(keyword, _)| label.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Resolve a raw code into its label and display glyph. Total: unrecognized
/// codes become [`Condition::Unknown`] with the default glyph.
pub fn normalize(code: &RawConditionCode) -> (Condition, &'static str) {
    let condition = match code {
        RawConditionCode::Wmo(code) => Condition::from_wmo_code(*code),
        RawConditionCode::Text(text) => Condition::from_text(text),
    };
    (condition, condition.icon())
}
