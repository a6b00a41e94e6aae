//! # Engine
//!
//! Personalized preference prediction: given a catalog item and a user's
//! rating history, estimate how much the user will enjoy the item (1-10),
//! how sure the engine is (0-0.9), and why.
//!
//! ## Pipeline
//! 1. **Attributes** (`attributes`): item -> canonical attribute keys
//! 2. **Profile** (`profile`): user history -> ratings filed per key
//! 3. **Signals** (`signals`): independent scorers compare candidate keys
//!    against the profile
//! 4. **Combiner** (`combiner`): weighted blend into one result
//!
//! The batch path (`batch`) builds the profile once and scores many items
//! in parallel; `cache` keeps profiles between calls until the user's
//! history changes.

pub mod attributes;
pub mod batch;
pub mod cache;
pub mod combiner;
pub mod config;
pub mod predictor;
pub mod profile;
pub mod signals;

pub use attributes::{AttributeKey, extract_attributes};
pub use batch::RankedItem;
pub use cache::{CacheStats, ProfileCache};
pub use combiner::{Combiner, PredictionResult};
pub use config::{EngineConfig, ScorerWeights, ScoringMethod};
pub use predictor::{Comparison, PreferencePredictor};
pub use profile::{TasteProfile, build_taste_profile};
pub use signals::{ScorerSet, Signal, SignalScorer, critic_consensus};
