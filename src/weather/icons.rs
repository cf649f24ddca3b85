//! Condition code to icon asset mapping

/// Icon assets a client can render for current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl WeatherIcon {
    /// Icon used for any condition code not in the table
    pub const DEFAULT: WeatherIcon = WeatherIcon::Clear;

    /// Map a provider condition code (`"10d"`, `"13n"`, ...) to an icon.
    /// Unknown codes map to [`WeatherIcon::DEFAULT`].
    #[must_use]
    pub fn from_condition_code(code: &str) -> Self {
        match code {
            "01d" | "01n" => WeatherIcon::Clear,
            "02d" | "02n" | "03d" | "03n" => WeatherIcon::Cloud,
            "04d" | "04n" => WeatherIcon::Drizzle,
            "09d" | "09n" | "10d" | "10n" => WeatherIcon::Rain,
            "13d" | "13n" => WeatherIcon::Snow,
            _ => Self::DEFAULT,
        }
    }

    /// Parse an icon reference back into an icon
    #[must_use]
    pub fn from_reference(reference: &str) -> Option<Self> {
        match reference {
            "clear" => Some(WeatherIcon::Clear),
            "cloud" => Some(WeatherIcon::Cloud),
            "drizzle" => Some(WeatherIcon::Drizzle),
            "rain" => Some(WeatherIcon::Rain),
            "snow" => Some(WeatherIcon::Snow),
            _ => None,
        }
    }

    /// Opaque reference stored in a weather summary
    #[must_use]
    pub fn reference(self) -> &'static str {
        match self {
            WeatherIcon::Clear => "clear",
            WeatherIcon::Cloud => "cloud",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
        }
    }

    /// Glyph for text renderings
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Clear => "☀️",
            WeatherIcon::Cloud => "☁️",
            WeatherIcon::Drizzle => "🌦️",
            WeatherIcon::Rain => "🌧️",
            WeatherIcon::Snow => "❄️",
        }
    }
}
