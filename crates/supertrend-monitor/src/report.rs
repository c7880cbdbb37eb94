//! Trace and scan reports.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use supertrend_core::types::{Bar, Direction, Signal};
use supertrend_indicators::{SupertrendOutput, SupertrendParams};

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════════════════\n";
const THIN: &str = "───────────────────────────────────────────────────────────────────────────────────────────\n";

fn format_time(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// One bar of a Supertrend trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRow {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub true_range: f64,
    /// NaN (null in JSON) during warmup
    pub atr: f64,
    pub upper: f64,
    pub lower: f64,
    pub value: f64,
    pub direction: Direction,
    pub flipped: bool,
}

impl TraceRow {
    pub fn new(bar: &Bar, output: &SupertrendOutput) -> Self {
        Self {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            true_range: output.true_range,
            atr: output.atr,
            upper: output.upper,
            lower: output.lower,
            value: output.value,
            direction: output.direction,
            flipped: output.flipped,
        }
    }
}

/// Aggregate view of a trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceSummary {
    pub bars: usize,
    /// Bars before the trend line was defined
    pub warmup_bars: usize,
    pub flips: usize,
    pub uptrend_bars: usize,
    pub downtrend_bars: usize,
    pub final_direction: Option<Direction>,
    pub final_value: Option<f64>,
}

impl TraceSummary {
    fn from_rows(rows: &[TraceRow]) -> Self {
        let defined: Vec<&TraceRow> = rows.iter().filter(|r| !r.value.is_nan()).collect();
        let last = defined.last();
        Self {
            bars: rows.len(),
            warmup_bars: rows.len() - defined.len(),
            flips: rows.iter().filter(|r| r.flipped).count(),
            uptrend_bars: defined.iter().filter(|r| r.direction.is_up()).count(),
            downtrend_bars: defined.iter().filter(|r| r.direction.is_down()).count(),
            final_direction: last.map(|r| r.direction),
            final_value: last.map(|r| r.value),
        }
    }
}

/// Bar-by-bar Supertrend trace for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    pub symbol: String,
    pub params: SupertrendParams,
    pub summary: TraceSummary,
    pub rows: Vec<TraceRow>,
}

impl TraceReport {
    /// Pair each bar with its engine output.
    pub fn new(
        symbol: impl Into<String>,
        params: SupertrendParams,
        bars: &[Bar],
        outputs: &[SupertrendOutput],
    ) -> Self {
        let rows: Vec<TraceRow> = bars
            .iter()
            .zip(outputs)
            .map(|(bar, output)| TraceRow::new(bar, output))
            .collect();
        Self {
            symbol: symbol.into(),
            params,
            summary: TraceSummary::from_rows(&rows),
            rows,
        }
    }

    /// Generate a text summary followed by the last `tail` rows (all if `None`).
    pub fn summary(&self, tail: Option<usize>) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str(RULE);
        out.push_str(&format!("  SUPERTREND TRACE  {}\n", self.symbol));
        out.push_str(RULE);
        out.push_str(&format!(
            "  ATR Period:     {}\n  Factor:         {}\n  Smoothing:      {}\n",
            self.params.atr_period, self.params.factor, self.params.smoothing
        ));
        out.push_str(&format!(
            "  Bars:           {} ({} warmup)\n  Flips:          {}\n",
            s.bars, s.warmup_bars, s.flips
        ));
        out.push_str(&format!(
            "  Uptrend Bars:   {}\n  Downtrend Bars: {}\n",
            s.uptrend_bars, s.downtrend_bars
        ));
        if let (Some(direction), Some(value)) = (s.final_direction, s.final_value) {
            out.push_str(&format!("  Final:          {} @ {:.4}\n", direction, value));
        }
        out.push('\n');

        out.push_str(&format!(
            "  {:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>5}\n",
            "time", "close", "tr", "atr", "upper", "lower", "line", "dir"
        ));
        out.push_str(THIN);

        let skip = tail.map_or(0, |n| self.rows.len().saturating_sub(n));
        for row in &self.rows[skip..] {
            out.push_str(&format!(
                "  {:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>5}{}\n",
                format_time(row.timestamp),
                cell(row.close),
                cell(row.true_range),
                cell(row.atr),
                cell(row.upper),
                cell(row.lower),
                cell(row.value),
                row.direction.to_string(),
                if row.flipped { " *" } else { "" }
            ));
        }
        out.push_str(RULE);

        out
    }

    /// Export to JSON. Undefined values become `null`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export rows to CSV. Undefined values are empty cells.
    pub fn to_csv(&self) -> String {
        let num = |v: f64| if v.is_nan() { String::new() } else { v.to_string() };
        let mut csv = String::from(
            "timestamp,open,high,low,close,true_range,atr,upper,lower,value,direction,flipped\n",
        );
        for r in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{}\n",
                r.timestamp,
                r.open,
                r.high,
                r.low,
                r.close,
                num(r.true_range),
                num(r.atr),
                num(r.upper),
                num(r.lower),
                num(r.value),
                r.direction,
                r.flipped
            ));
        }
        csv
    }
}

/// Scan result for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolScan {
    pub symbol: String,
    pub bars: usize,
    pub signals: Vec<Signal>,
    /// Load or strategy failure for this symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolScan {
    pub fn failed(symbol: impl Into<String>, error: impl ToString) -> Self {
        Self {
            symbol: symbol.into(),
            bars: 0,
            signals: vec![],
            error: Some(error.to_string()),
        }
    }
}

/// Strategy scan over several symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub strategy: String,
    pub results: Vec<SymbolScan>,
}

impl ScanReport {
    pub fn total_signals(&self) -> usize {
        self.results.iter().map(|r| r.signals.len()).sum()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        out.push_str(RULE);
        out.push_str(&format!("  SCAN  {}\n", self.strategy));
        out.push_str(RULE);

        for result in &self.results {
            match &result.error {
                Some(error) => {
                    out.push_str(&format!("  {:<8} ERROR {}\n", result.symbol, error));
                }
                None => {
                    out.push_str(&format!(
                        "  {:<8} {} bars, {} signals\n",
                        result.symbol,
                        result.bars,
                        result.signals.len()
                    ));
                    for signal in &result.signals {
                        out.push_str(&format!(
                            "    {}  {}\n",
                            format_time(signal.timestamp),
                            signal
                        ));
                    }
                }
            }
        }

        out.push_str(THIN);
        out.push_str(&format!(
            "  {} symbols, {} signals\n",
            self.results.len(),
            self.total_signals()
        ));
        out.push_str(RULE);
        out
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supertrend_core::types::{SignalMetadata, SignalStrength, SignalType};
    use supertrend_indicators::Supertrend;

    fn trace() -> TraceReport {
        let bars = vec![
            Bar::from_hlc(0, 10.0, 8.0, 9.0),
            Bar::from_hlc(60_000, 11.0, 9.0, 10.5),
            Bar::from_hlc(120_000, 9.0, 7.0, 7.5),
            Bar::from_hlc(180_000, 8.0, 6.0, 6.5),
            Bar::from_hlc(240_000, 12.0, 10.0, 11.5),
        ];
        let params = SupertrendParams::new(2, 1.0);
        let mut engine = Supertrend::new(params).unwrap();
        let outputs: Vec<_> = bars.iter().map(|b| engine.update(b)).collect();
        TraceReport::new("TEST", params, &bars, &outputs)
    }

    #[test]
    fn test_trace_summary_counts() {
        let report = trace();
        let s = &report.summary;

        assert_eq!(s.bars, 5);
        assert_eq!(s.warmup_bars, 1);
        assert_eq!(s.flips, 1);
        assert_eq!(s.downtrend_bars, 3);
        assert_eq!(s.uptrend_bars, 1);
        assert_eq!(s.final_direction, Some(Direction::Uptrend));
        assert_eq!(s.final_value, Some(7.0625));
    }

    #[test]
    fn test_trace_text() {
        let text = trace().summary(Some(2));

        assert!(text.contains("SUPERTREND TRACE  TEST"));
        assert!(text.contains("7.0625"));
        assert!(text.contains(" *"));
        // Warmup row is outside the tail
        assert!(!text.contains("1970-01-01 00:00 "));
    }

    #[test]
    fn test_trace_json_nulls_warmup() {
        let json: serde_json::Value = serde_json::from_str(&trace().to_json().unwrap()).unwrap();

        assert!(json["rows"][0]["atr"].is_null());
        assert_eq!(json["rows"][1]["atr"], 2.0);
        assert_eq!(json["rows"][4]["direction"], "uptrend");
        assert_eq!(json["params"]["smoothing"], "wilder");
    }

    #[test]
    fn test_trace_csv() {
        let csv = trace().to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("0,9,10,8,9,2,,,,,down,false"));
        assert!(lines[5].ends_with("up,true"));
    }

    #[test]
    fn test_scan_report() {
        let signal = Signal {
            symbol: "AAPL".to_string(),
            signal_type: SignalType::Buy,
            strength: SignalStrength::Strong,
            price: 101.0,
            timestamp: 0,
            confidence: 0.9,
            metadata: SignalMetadata::default(),
        };
        let report = ScanReport {
            strategy: "supertrend_flip".to_string(),
            results: vec![
                SymbolScan {
                    symbol: "AAPL".to_string(),
                    bars: 100,
                    signals: vec![signal],
                    error: None,
                },
                SymbolScan::failed("MSFT", "Symbol not found: MSFT"),
            ],
        };

        assert_eq!(report.total_signals(), 1);
        let text = report.summary();
        assert!(text.contains("AAPL     100 bars, 1 signals"));
        assert!(text.contains("MSFT     ERROR"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json["results"][0].get("error").is_none());
        assert_eq!(json["results"][1]["error"], "Symbol not found: MSFT");
    }
}
