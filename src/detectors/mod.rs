pub mod alerts;
pub mod arbitrage;
pub mod hybrid;
pub mod timing;
