use serde::Serialize;

use super::ma::sma_tail;
use crate::bar::BarSeries;
use crate::quote::round2;

pub const DEFAULT_PERIOD: usize = 20;
const WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bollinger {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bands at ±2 population standard deviations around the `period` mean close.
pub fn bollinger(series: &BarSeries, period: usize) -> Option<Bollinger> {
    let closes = series.closes();
    let middle = sma_tail(&closes, period)?;

    let window = &closes[closes.len() - period..];
    let variance = window.iter().map(|c| (c - middle).powi(2)).sum::<f64>() / period as f64;
    let sigma = variance.sqrt();

    Some(Bollinger {
        middle: round2(middle),
        upper: round2(middle + WIDTH * sigma),
        lower: round2(middle - WIDTH * sigma),
    })
}
