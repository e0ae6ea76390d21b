pub mod context;
pub mod context_data;
pub mod control;
pub mod step;

pub use context::Handler;
pub use context_data::ContextData;
pub use control::{FlowResult, StepControl};
pub use step::StepDef;
