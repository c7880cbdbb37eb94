//! SIMD kernels for column-oriented OHLC data.
//!
//! These use the `wide` crate for portable SIMD and produce exactly the
//! same values as the scalar bar-by-bar versions for finite input.

use wide::f64x4;

/// True range over parallel high/low/close columns.
///
/// Index 0 is `high - low`; later indices use the previous close.
/// Output length is the shortest input length.
pub fn true_range_simd(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let len = high.len().min(low.len()).min(close.len());
    if len == 0 {
        return vec![];
    }

    let mut result = Vec::with_capacity(len);
    result.push(high[0] - low[0]);

    let rest = len - 1;
    let chunks = rest / 4;

    for c in 0..chunks {
        let i = 1 + c * 4;
        let h = f64x4::new([high[i], high[i + 1], high[i + 2], high[i + 3]]);
        let l = f64x4::new([low[i], low[i + 1], low[i + 2], low[i + 3]]);
        let pc = f64x4::new([close[i - 1], close[i], close[i + 1], close[i + 2]]);

        let hl = h - l;
        let hc = (h - pc).abs();
        let lc = (l - pc).abs();

        result.extend(hl.max(hc).max(lc).to_array());
    }

    // Handle remaining elements
    for i in (1 + chunks * 4)..len {
        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        result.push(hl.max(hc).max(lc));
    }

    result
}

/// Bar midpoints `(high + low) / 2` over parallel columns.
pub fn midpoint_simd(high: &[f64], low: &[f64]) -> Vec<f64> {
    let len = high.len().min(low.len());
    let mut result = Vec::with_capacity(len);
    let half = f64x4::splat(0.5);

    let chunks = len / 4;
    for c in 0..chunks {
        let i = c * 4;
        let h = f64x4::new([high[i], high[i + 1], high[i + 2], high[i + 3]]);
        let l = f64x4::new([low[i], low[i + 1], low[i + 2], low[i + 3]]);
        result.extend(((h + l) * half).to_array());
    }

    for i in (chunks * 4)..len {
        result.push((high[i] + low[i]) / 2.0);
    }

    result
}
