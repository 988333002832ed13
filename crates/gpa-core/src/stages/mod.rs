//! Stages of the appointments analysis, in execution order.

mod extraction;
mod graphing;
mod joining;
mod loading;
mod output;
mod summarisation;

pub use extraction::ExtractionStage;
pub use graphing::GraphingStage;
pub use joining::JoiningStage;
pub use loading::LoadingStage;
pub use output::OutputStage;
pub use summarisation::SummarisationStage;
