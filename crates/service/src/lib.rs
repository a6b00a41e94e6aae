//! # Service
//!
//! Async façade over the prediction engine. Engine calls are CPU-bound and
//! synchronous, so every request runs on tokio's blocking pool and the
//! caller just awaits the result.
//!
//! ```ignore
//! let service = PredictionService::new(Arc::new(predictor))
//!     .with_timeout(Duration::from_millis(250));
//! let result = service.predict(item, "ana").await?;
//! ```

pub mod error;
pub mod predictions;

pub use error::{Result, ServiceError};
pub use predictions::PredictionService;
