//! Weather report rendering
//!
//! Pure functions only: the same address and summary always produce
//! byte-identical output.

use std::fmt::Write as _;

use crate::models::{EmailAddress, WeatherSummary};
use crate::weather::WeatherIcon;

pub const SERVICE_NAME: &str = "Weather Mailer";

const DISCLAIMER: &str = "Conditions are reported by a third-party weather service at the time \
of your request and may have changed since. This report was sent because someone asked for it \
to be delivered to this address.";

/// Subject and bodies of one report email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render a report for `summary` addressed to `recipient`
#[must_use]
pub fn render_report(recipient: &EmailAddress, summary: &WeatherSummary) -> RenderedReport {
    RenderedReport {
        subject: subject(summary),
        html: render_html(recipient, summary),
        text: render_text(summary),
    }
}

#[must_use]
pub fn subject(summary: &WeatherSummary) -> String {
    format!("Weather Report for {}", summary.location)
}

fn icon_label(summary: &WeatherSummary) -> String {
    match WeatherIcon::from_reference(&summary.icon_reference) {
        Some(icon) => format!("{} {}", icon.glyph(), icon.reference()),
        None => summary.icon_reference.clone(),
    }
}

fn render_text(summary: &WeatherSummary) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{SERVICE_NAME}");
    let _ = writeln!(text);
    let _ = writeln!(
        text,
        "The temperature in {} is {} with {} humidity and wind speed of {}.",
        summary.location,
        summary.format_temperature(),
        summary.format_humidity(),
        summary.format_wind()
    );
    let _ = writeln!(text);
    let _ = writeln!(text, "Conditions:  {}", icon_label(summary));
    let _ = writeln!(text, "Temperature: {}", summary.format_temperature());
    let _ = writeln!(text, "Humidity:    {}", summary.format_humidity());
    let _ = writeln!(text, "Wind speed:  {}", summary.format_wind());
    let _ = writeln!(text);
    let _ = writeln!(text, "--");
    let _ = write!(text, "{DISCLAIMER}");
    text
}

fn render_html(recipient: &EmailAddress, summary: &WeatherSummary) -> String {
    let location = escape_html(&summary.location);
    let icon = escape_html(&icon_label(summary));
    let temperature = escape_html(&summary.format_temperature());
    let humidity = escape_html(&summary.format_humidity());
    let wind = escape_html(&summary.format_wind());
    let recipient = escape_html(recipient.as_str());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather Report for {location}</title>
</head>
<body style="margin:0;padding:24px;background:#e6ecf5;font-family:Helvetica,Arial,sans-serif;color:#1f2933;">
<table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width:480px;margin:0 auto;background:linear-gradient(45deg,#2f4680,#500ae4);border-radius:12px;color:#ffffff;">
<tr><td style="padding:24px 24px 0;font-size:14px;letter-spacing:1px;text-transform:uppercase;">{SERVICE_NAME}</td></tr>
<tr><td style="padding:16px 24px 0;font-size:20px;">{icon}</td></tr>
<tr><td style="padding:8px 24px 0;font-size:64px;line-height:1;">{temperature}</td></tr>
<tr><td style="padding:8px 24px 16px;font-size:32px;">{location}</td></tr>
<tr><td style="padding:0 24px 24px;">
<table role="presentation" width="100%" cellspacing="0" cellpadding="0">
<tr>
<td style="font-size:20px;">{humidity}<br><span style="font-size:14px;">Humidity</span></td>
<td style="font-size:20px;text-align:right;">{wind}<br><span style="font-size:14px;">Wind Speed</span></td>
</tr>
</table>
</td></tr>
</table>
<p style="max-width:480px;margin:16px auto 0;font-size:12px;color:#52606d;">Sent to {recipient}. {DISCLAIMER}</p>
</body>
</html>
"#
    )
}

/// Escape text for use in HTML element content and attribute values
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
