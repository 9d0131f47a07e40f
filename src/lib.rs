// Pulseboard - thin clients for wearable health data pipelines
//
// This facade re-exports the member crates so applications can depend on a
// single package and pick the integrations they need via feature flags.

// Re-export optional crates
#[cfg(feature = "elastic")]
pub use pulseboard_elastic as elastic;

#[cfg(feature = "corsano")]
pub use pulseboard_corsano as corsano;
