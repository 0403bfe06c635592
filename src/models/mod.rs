mod brand;
mod chat;
mod narrative;
mod performance;
mod settings;

pub use brand::BrandSettings;
pub use chat::{ChatMessage, ChatRole};
pub use narrative::{EditedContent, GeneratedNarrative, NarrativeSection};
pub use performance::{
    AggregatedInputs, Attribution, AttributionItem, ParsedInputData, PerformanceData,
};
pub use settings::{GenerationSettings, LetterFormat, SectionId, SectionToggles, Tone};
