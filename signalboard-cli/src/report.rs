//! Text rendering of an analysis for the terminal.

use std::fmt::Write;

use signalboard_core::config::{AnalysisConfig, DisplayThresholds};
use signalboard_core::data::DataSource;
use signalboard_core::domain::{IndicatorSet, Trigger};
use signalboard_core::engine::Analysis;

/// Overall reading of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    StrongBuy,
    WeakBuy,
    Neutral,
    WeakSell,
    StrongSell,
}

impl Strength {
    pub fn from_score(score: i32, thresholds: &DisplayThresholds) -> Self {
        if score >= thresholds.strong_score {
            Strength::StrongBuy
        } else if score >= thresholds.weak_score {
            Strength::WeakBuy
        } else if score <= -thresholds.strong_score {
            Strength::StrongSell
        } else if score <= -thresholds.weak_score {
            Strength::WeakSell
        } else {
            Strength::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::StrongBuy => "STRONG BUY",
            Strength::WeakBuy => "weak buy",
            Strength::Neutral => "neutral",
            Strength::WeakSell => "weak sell",
            Strength::StrongSell => "STRONG SELL",
        }
    }
}

fn arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "→"
    }
}

fn trigger_list(out: &mut String, title: &str, triggers: &[Trigger]) {
    if triggers.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for t in triggers {
        let _ = writeln!(out, "  • {t}");
    }
}

fn rsi_reading(rsi: f64, config: &AnalysisConfig) -> &'static str {
    if rsi < config.rules.rsi_oversold {
        "oversold"
    } else if rsi > config.rules.rsi_overbought {
        "overbought"
    } else {
        "neutral"
    }
}

fn bollinger_reading(close: f64, ind: &IndicatorSet) -> &'static str {
    if close < ind.bb_lower {
        "below lower band (rebound zone)"
    } else if close > ind.bb_upper {
        "above upper band (overheated)"
    } else {
        "inside the bands"
    }
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{:<16}{value}", format!("{label}:"));
}

/// Last `len` trend glyphs, oldest first.
pub fn trend_strip(analysis: &Analysis, len: usize) -> String {
    let start = analysis.bars.len().saturating_sub(len);
    analysis.bars[start..]
        .iter()
        .map(|b| b.trend.glyph())
        .collect()
}

/// Multi-line summary of one analysis.
pub fn render_text(analysis: &Analysis, config: &AnalysisConfig, strip_len: usize) -> String {
    let mut out = String::new();
    let latest = &analysis.latest.ready;
    let previous = &analysis.previous.ready;
    let ind = &latest.indicators;
    let params = &config.indicators;

    // Header
    let _ = writeln!(out);
    let _ = writeln!(out, "=== {} ===", analysis.display_name);
    let _ = writeln!(
        out,
        "{} · {} · as of {}",
        analysis.symbol,
        analysis.timeframe,
        latest.bar.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    let (change, pct) = analysis.price_change();
    let pct = pct.map(|p| format!(" ({p:+.2}%)")).unwrap_or_default();
    let _ = writeln!(
        out,
        "Close:          {:.2} {} {change:+.2}{pct}",
        latest.close(),
        arrow(change)
    );

    // Verdict
    let strength = Strength::from_score(analysis.latest.score, &config.display);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Signal:         {} (score {}, previous {})",
        strength.label(),
        analysis.latest.score,
        analysis.previous.score
    );

    // Transitions
    let _ = writeln!(out);
    if analysis.transitions.is_empty() {
        let _ = writeln!(out, "No transition signals");
    } else {
        trigger_list(&mut out, "Buy triggers:", &analysis.transitions.buy);
        trigger_list(&mut out, "Sell triggers:", &analysis.transitions.sell);
    }

    // Indicator breakdown
    let b = &analysis.breakdown;
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Indicators ---");
    row(
        &mut out,
        &format!("EMA{}/{}", params.ema_fast, params.ema_slow),
        format!(
            "{} ({:+})",
            if ind.ema_fast > ind.ema_slow { "rising" } else { "falling" },
            b.ema
        ),
    );
    row(
        &mut out,
        &format!("RSI{}", params.rsi_period),
        format!("{} {:.1} ({:+})", rsi_reading(ind.rsi, config), ind.rsi, b.rsi),
    );
    row(
        &mut out,
        "MACD",
        format!(
            "{} ({:+})",
            if ind.macd > ind.macd_signal {
                "golden (above signal)"
            } else {
                "dead (at or below signal)"
            },
            b.macd
        ),
    );
    row(
        &mut out,
        "Bollinger",
        format!("{} ({:+})", bollinger_reading(latest.close(), ind), b.bollinger),
    );
    row(
        &mut out,
        "OBV",
        format!(
            "{} ({:+})",
            if ind.obv > previous.indicators.obv { "rising" } else { "falling" },
            b.obv
        ),
    );
    let atr = match analysis.atr_pct() {
        Some(pct) if pct > config.display.high_volatility_atr_pct => {
            format!("{pct:.2}% of close high volatility")
        }
        Some(pct) => format!("{pct:.2}% of close"),
        None => "n/a (zero close)".to_string(),
    };
    row(&mut out, &format!("ATR{}", params.atr_period), atr);

    // Trend strip
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Trend:          {}   (+ buy, - sell, . neutral)",
        trend_strip(analysis, strip_len)
    );
    let _ = writeln!(
        out,
        "Bars:           {} ({} warmup)",
        analysis.raw_bar_count, analysis.warmup_dropped
    );

    if analysis.source == Some(DataSource::Synthetic) {
        let _ = writeln!(out);
        let _ = writeln!(out, "WARNING: Results based on SYNTHETIC data");
    }

    out
}
