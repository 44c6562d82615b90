//! Render a portfolio snapshot as the static dashboard page.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;

use crate::types::{PortfolioSnapshot, Position};
use crate::utils::{escape_html, format_currency, format_gain, sanitize_symbol};

const STYLE: &str = include_str!("assets/page.css");

const CARD_DELAY_SCRIPT: &str = r#"<script>
document.addEventListener("DOMContentLoaded", () => {
    document.querySelectorAll('.row-card').forEach((card, index) => {
        card.style.setProperty('--delay', `${index * 0.08}s`);
    });
});
</script>"#;

pub const EMPTY_NOTICE: &str = "<h2>No positions found</h2>";

/// Direction of a position's gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn from_gain(pct: Decimal) -> Self {
        match pct.cmp(&Decimal::ZERO) {
            Ordering::Greater => Trend::Up,
            Ordering::Less => Trend::Down,
            Ordering::Equal => Trend::Neutral,
        }
    }

    fn card_class(self) -> &'static str {
        match self {
            Trend::Up => "row-card positive",
            Trend::Down => "row-card negative",
            Trend::Neutral => "row-card",
        }
    }

    fn indicator(self) -> &'static str {
        match self {
            Trend::Up => r#"<div class="arrow gain-positive">▲</div>"#,
            Trend::Down => r#"<div class="arrow gain-negative">▼</div>"#,
            Trend::Neutral => r#"<div class="arrow neutral-square"></div>"#,
        }
    }

    fn profit_class(self) -> &'static str {
        match self {
            Trend::Up => "profit gain-positive",
            Trend::Down => "profit gain-negative",
            Trend::Neutral => "profit",
        }
    }
}

/// A finished HTML document.
#[derive(Debug, Clone)]
pub struct Report {
    html: String,
}

impl Report {
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Render with the current local wall-clock time as the "last updated" stamp.
pub fn render(snapshot: &PortfolioSnapshot, favicon: &str) -> Report {
    render_at(snapshot, Local::now().naive_local(), favicon)
}

pub fn render_at(
    snapshot: &PortfolioSnapshot,
    generated_at: NaiveDateTime,
    favicon: &str,
) -> Report {
    if snapshot.is_empty() {
        return Report {
            html: EMPTY_NOTICE.to_string(),
        };
    }

    let mut html = String::new();
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n");
    html.push_str(&format!(
        "<link rel=\"shortcut icon\" type=\"image/x-icon\" href=\"{}\">\n",
        escape_html(favicon)
    ));
    html.push_str(CARD_DELAY_SCRIPT);
    html.push('\n');
    html.push_str(&header(snapshot.total_equity, generated_at));
    for position in ordered(&snapshot.positions) {
        html.push_str(&card(position));
    }
    Report { html }
}

/// Highest value first; equal values keep API order.
pub fn ordered(positions: &[Position]) -> Vec<&Position> {
    let mut out: Vec<&Position> = positions.iter().collect();
    out.sort_by(|a, b| b.value.cmp(&a.value));
    out
}

fn header(total: Decimal, generated_at: NaiveDateTime) -> String {
    format!(
        "<h1 class='portfolio-value'>{}</h1>\n<div class='timestamp'>last updated: {}</div>\n",
        format_currency(total),
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

fn card(p: &Position) -> String {
    let trend = Trend::from_gain(p.gain_pct);
    format!(
        r#"
<div class="{card_class}">
    <div class="row-content">
        <div class="symbol-row">
            <div class="symbol">{symbol}</div>
            {indicator}
        </div>
        <div class="value">{value}</div>
        <div class="{profit_class}">{gain}</div>
        <div class="day">bought: {day}</div>
    </div>
</div>
"#,
        card_class = trend.card_class(),
        symbol = escape_html(&sanitize_symbol(&p.symbol)),
        indicator = trend.indicator(),
        value = format_currency(p.value),
        profit_class = trend.profit_class(),
        gain = format_gain(p.gain_pct),
        day = p.acquired_on.format("%Y-%m-%d"),
    )
}
