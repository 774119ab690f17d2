//! Confluence analysis: one trade call from several indicator readings.
//!
//! Market structure (SMC trend) and momentum (MACD histogram) must agree
//! before an entry is called; RSI or an SMI crossover from an extreme then
//! confirms the entry zone. Risk levels are sized from recent volatility.

use crate::domain::{Bias, Candle, IndicatorKind};
use crate::engine::SignalReport;
use crate::indicators::{sma_of_series, true_range};
use serde::{Deserialize, Serialize};

/// Number of true ranges averaged into the volatility estimate.
pub const VOLATILITY_WINDOW: usize = 14;

const MAX_CONFIDENCE: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    StrongBuy,
    StrongSell,
    Neutral,
    /// Some input was undefined; no call is made.
    Waiting,
}

/// Indicator readings the analysis combines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfluenceInputs {
    pub trend: Bias,
    pub macd_histogram: f64,
    pub rsi: f64,
    pub smi: f64,
    pub smi_signal: f64,
    /// Mean true range over the last `VOLATILITY_WINDOW` bars.
    pub volatility: f64,
    pub close: f64,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub signal: SignalType,
    pub confidence: u8,
    pub reasoning: String,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Open time of the last candle.
    pub timestamp: i64,
}

impl Analysis {
    /// Combine a report's outcomes with volatility from the same candles.
    ///
    /// Any undefined input gives a `Waiting` analysis.
    pub fn from_report(report: &SignalReport, candles: &[Candle]) -> Self {
        match ConfluenceInputs::from_report(report, candles) {
            Some(inputs) => analyze(&inputs),
            None => Self::waiting(report, candles),
        }
    }

    fn waiting(report: &SignalReport, candles: &[Candle]) -> Self {
        let close = candles.last().map_or(f64::NAN, |c| c.close);
        let missing: Vec<&str> = [
            IndicatorKind::Smc,
            IndicatorKind::Macd,
            IndicatorKind::Rsi,
            IndicatorKind::Smi,
        ]
        .into_iter()
        .filter(|kind| !report.get(*kind).is_some_and(|o| o.is_defined()))
        .map(IndicatorKind::as_str)
        .collect();

        let reasoning = if missing.is_empty() {
            format!("Not enough history for a {VOLATILITY_WINDOW}-bar volatility estimate.")
        } else {
            format!("Waiting for indicator history: {}.", missing.join(", "))
        };

        Self {
            signal: SignalType::Waiting,
            confidence: 0,
            reasoning,
            stop_loss: close * 0.98,
            take_profit: close * 1.02,
            timestamp: report.last_time,
        }
    }
}

impl ConfluenceInputs {
    /// Extract the readings, `None` if any is undefined.
    pub fn from_report(report: &SignalReport, candles: &[Candle]) -> Option<Self> {
        let record = move |kind| report.get(kind).and_then(|o| o.record());

        let smc = record(IndicatorKind::Smc)?;
        let macd = record(IndicatorKind::Macd)?;
        let rsi = record(IndicatorKind::Rsi)?;
        let smi = record(IndicatorKind::Smi)?;
        let last = candles.last()?;

        let inputs = Self {
            trend: smc.bias(),
            macd_histogram: macd.extra("histogram")?,
            rsi: rsi.value(),
            smi: smi.value(),
            smi_signal: smi.extra("signal_line")?,
            volatility: volatility(candles)?,
            close: last.close,
            time: last.time,
        };
        inputs.is_finite().then_some(inputs)
    }

    fn is_finite(&self) -> bool {
        [
            self.macd_histogram,
            self.rsi,
            self.smi,
            self.smi_signal,
            self.volatility,
            self.close,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Mean of the last `VOLATILITY_WINDOW` true ranges.
pub fn volatility(candles: &[Candle]) -> Option<f64> {
    if candles.len() < VOLATILITY_WINDOW {
        return None;
    }
    let mean = *sma_of_series(&true_range(candles), VOLATILITY_WINDOW).last()?;
    (!mean.is_nan()).then_some(mean)
}

fn trend_label(trend: Bias) -> &'static str {
    match trend {
        Bias::Bullish => "bullish",
        Bias::Bearish => "bearish",
        Bias::Neutral => "ranging",
    }
}

/// Apply the confluence rules to a set of readings.
pub fn analyze(inputs: &ConfluenceInputs) -> Analysis {
    let ConfluenceInputs {
        trend,
        macd_histogram,
        rsi,
        smi,
        smi_signal,
        volatility,
        close,
        time,
    } = *inputs;

    let bullish_setup = trend == Bias::Bullish && macd_histogram > 0.0;
    let bearish_setup = trend == Bias::Bearish && macd_histogram < 0.0;

    let (signal, mut confidence, mut reasoning) = if bullish_setup {
        let smi_cross_up = smi > smi_signal && smi < -20.0;
        if rsi < 45.0 || smi_cross_up {
            (
                SignalType::StrongBuy,
                82,
                "STRONG BUY: Bullish Market Structure + Momentum Shift. RSI/SMI confirms entry zone."
                    .to_string(),
            )
        } else {
            (
                SignalType::Neutral,
                60,
                "Bullish Trend detected, but waiting for optimal entry (Dip).".to_string(),
            )
        }
    } else if bearish_setup {
        let smi_cross_down = smi < smi_signal && smi > 20.0;
        if rsi > 55.0 || smi_cross_down {
            (
                SignalType::StrongSell,
                82,
                "STRONG SELL: Bearish Market Structure + Momentum Shift. RSI/SMI confirms entry zone."
                    .to_string(),
            )
        } else {
            (
                SignalType::Neutral,
                60,
                "Bearish Trend detected, but waiting for optimal entry (Rally).".to_string(),
            )
        }
    } else {
        (
            SignalType::Neutral,
            40,
            format!(
                "Market is {}. Indicators are mixed. Waiting for clear structure break.",
                trend_label(trend)
            ),
        )
    };

    if signal == SignalType::StrongBuy && rsi < 30.0 {
        confidence += 8;
        reasoning.push_str(" (Deep Oversold)");
    }
    if signal == SignalType::StrongSell && rsi > 70.0 {
        confidence += 8;
        reasoning.push_str(" (Deep Overbought)");
    }

    let (stop_loss, take_profit) = match signal {
        SignalType::StrongBuy => (close - volatility * 2.0, close + volatility * 4.0),
        SignalType::StrongSell => (close + volatility * 2.0, close - volatility * 4.0),
        SignalType::Neutral | SignalType::Waiting => (close * 0.98, close * 1.02),
    };

    Analysis {
        signal,
        confidence: confidence.min(MAX_CONFIDENCE),
        reasoning,
        stop_loss,
        take_profit,
        timestamp: time,
    }
}
