pub mod factory;
pub mod orchestrator;
pub mod probe;

pub use factory::create_discoverer;
pub use orchestrator::{Discoverer, DiscoveryResult, SkillMatch};
pub use probe::{
    ContentEntry, ContentsLookup, DEFAULT_API_BASE, ProbeOutcome, Prober, candidate_paths,
};
