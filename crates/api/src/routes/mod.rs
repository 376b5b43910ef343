mod generate;
mod health;

pub use generate::chart_router;
pub use health::health_router;
