use chrono::{DateTime, Local, Utc};
use dashboard_api::{BacktestResult, SentimentLabel, SentimentRecord};
use std::fmt::Write as _;
use watchlist_sync::WatchlistView;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub const NO_SENTIMENT: &str = "No sentiment data available.";
pub const NO_BACKTESTING: &str = "No backtesting data available.";

/// Fixed series colours for well-known tickers.
pub fn stock_color(stock: &str) -> &'static str {
    match stock {
        "AAPL" => "#8884d8",
        "TSLA" => "#82ca9d",
        "GOOGL" => "#ff7300",
        "MSFT" => "#ffbb28",
        "AMZN" => "#d884d8",
        "NFLX" => "#ca829d",
        "NVDA" => "#34c9eb",
        "META" => "#eb4034",
        "IBM" => "#0088FE",
        _ => "#000",
    }
}

pub fn sentiment_badge(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "▲ Positive",
        SentimentLabel::Negative => "▼ Negative",
        SentimentLabel::Neutral => "● Neutral",
    }
}

pub fn profit_badge(result: &BacktestResult) -> String {
    if result.is_profitable() {
        format!("+{}%", result.profit_loss)
    } else {
        format!("{}%", result.profit_loss)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub stock: String,
    pub price: f64,
}

/// Flatten every result's price history into one series of points.
pub fn chart_points(results: &[BacktestResult]) -> Vec<ChartPoint> {
    results
        .iter()
        .flat_map(|result| {
            result.historical_data.iter().map(|point| ChartPoint {
                date: point.date.clone(),
                stock: result.stock.clone(),
                price: point.price,
            })
        })
        .collect()
}

pub fn sparkline(prices: &[f64]) -> String {
    let (min, max) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let span = max - min;

    prices
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let idx = ((p - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(headers.to_vec()));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub fn watchlist(view: &WatchlistView, synced_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.heading);

    if view.show_input {
        let affordance = if view.can_submit { "add" } else { "add (disabled)" };
        let _ = writeln!(out, "Input: [{}]  <{}>", view.input, affordance);
    }

    for row in &view.rows {
        match &row.remove_symbol {
            Some(_) => {
                let _ = writeln!(out, "  {}  [x]", row.label);
            }
            None => {
                let _ = writeln!(out, "  {}", row.label);
            }
        }
    }

    if let Some(message) = view.message {
        let _ = writeln!(out, "{}", message);
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {}", error);
    }
    if let Some(at) = synced_at {
        let _ = writeln!(
            out,
            "Last synced {}",
            at.with_timezone(&Local).format("%H:%M:%S")
        );
    }
    out
}

pub fn sentiment(records: &[SentimentRecord]) -> String {
    let mut out = String::from("== Stock Sentiment Analysis ==\n");
    if records.is_empty() {
        out.push_str(NO_SENTIMENT);
        out.push('\n');
        return out;
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.stock_symbol.clone(),
                sentiment_badge(r.label()).to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&["Stock Symbol", "Sentiment"], &rows));
    out
}

pub fn backtesting(results: &[BacktestResult]) -> String {
    let mut out = String::from("== Backtesting Results ==\n");
    if results.is_empty() {
        out.push_str(NO_BACKTESTING);
        out.push('\n');
        return out;
    }

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.strategy.clone(),
                r.stock.clone(),
                profit_badge(r),
            ]
        })
        .collect();
    out.push_str("-- Strategy Performance Summary --\n");
    out.push_str(&table(&["Strategy", "Stock", "Profit/Loss"], &rows));

    let points = chart_points(results);
    if !points.is_empty() {
        out.push_str("-- Price Movement Over Time --\n");
        for result in results {
            let series: Vec<&ChartPoint> =
                points.iter().filter(|p| p.stock == result.stock).collect();
            let (Some(first), Some(last)) = (series.first(), series.last()) else {
                continue;
            };
            let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
            let _ = writeln!(
                out,
                "{:<6} {:<8} {}  {}..{}",
                result.stock,
                stock_color(&result.stock),
                sparkline(&prices),
                first.date,
                last.date
            );
        }
    }
    out
}
