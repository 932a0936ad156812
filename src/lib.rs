pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod utils;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use model::{Pipeline, Predictor};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub config: Config,
}
