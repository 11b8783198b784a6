pub mod map;
pub mod normalizer;
pub mod pipeline;
pub mod providers;
pub mod recommendations;
pub mod session;
pub mod stats;
pub mod voice;
