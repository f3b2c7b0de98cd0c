pub mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod fsops;
pub mod materialize;
pub mod packer;
pub mod reconcile;
pub mod scanner;
pub mod segregate;
pub mod units;

pub use config::AppConfig;
pub use engine::{
    DistributeEngine, DistributeOutcome, DistributeResult, ManifestEngine, ManifestOutcome,
    ManifestResult,
};
pub use error::Error;
pub use events::{CollectingSink, Event, EventSink, Level, SilentSink};
pub use packer::{OversizePolicy, Partition};
pub use units::SizeLimit;
