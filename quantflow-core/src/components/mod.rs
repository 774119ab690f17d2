//! Component traits shared by every indicator.

pub mod indicator;

pub use indicator::{Indicator, IndicatorValues, SignalIndicator};
