pub mod action_plan;
pub mod freedom_path;
pub mod liquidity;
pub mod scenario;
