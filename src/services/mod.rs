pub mod config;
pub mod export;
pub mod frequency;
pub mod image_source;
pub mod mileage_run;
pub mod pair_reconciler;
pub mod recognition;
