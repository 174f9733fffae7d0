//! Script handling: from raw indicator text to something a calculator can run.
//!
//! Classification is ordered and first-match-wins: logistic regression, then
//! the regression/bull-bear pair, then the generic line-by-line parser. Nothing
//! here fails: unrecognised text simply yields fewer descriptors.

pub mod classify;
pub mod descriptor;
pub mod palette;
pub mod params;
pub mod parser;
pub mod templates;

pub use classify::{classify, ScriptKind};
pub use descriptor::{IndicatorDescriptor, IndicatorKind};
pub use palette::resolve_color;
pub use parser::parse_indicators;
pub use templates::{all_templates, find_template, ScriptTemplate, INDICATOR_TEMPLATES, ML_TEMPLATES};
