pub mod compare;
pub mod presets;
pub mod sensitivity;

pub use compare::{compare, compare_properties, waterfall, Comparison, WaterfallStep};
pub use presets::{find_preset, preset_or_default, Preset, DEFAULT_INPUTS, PRESETS};
pub use sensitivity::{apply_shift, run_sensitivity, sensitivity_grid, SensitivityShift};
