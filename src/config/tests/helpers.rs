//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::SutureConfig;

/// Source a configuration layer is pushed as.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` in order, later layers taking precedence.
pub fn compose(layers: &[(Layer, Value)]) -> SutureConfig {
    let mut composer = MergeComposer::new();
    for (layer, value) in layers.iter().cloned() {
        match layer {
            Layer::Defaults => composer.push_defaults(value),
            Layer::File => composer.push_file(value, None),
            Layer::Environment => composer.push_environment(value),
            Layer::Cli => composer.push_cli(value),
        }
    }
    SutureConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}
