//! Conversion pipeline: debounced input, result derivation and staged reveal,
//! driven by a single converter task.

pub mod compute;
pub mod config;
pub mod converter;
pub mod debounce;
pub mod error;
pub mod reveal;

pub use compute::{ComputationTrigger, ConvertError, raw_result, try_convert};
pub use config::ConverterConfig;
pub use converter::{ConverterEvent, ConverterHandle, ConverterService, ConverterView};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use error::ConverterError;
pub use reveal::{DEFAULT_SETTLE, RevealDecision, RevealPhase, StagedReveal};
