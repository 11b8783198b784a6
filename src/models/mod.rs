mod filter;
mod internship;
mod profile;

pub use filter::{FilterCriteria, SortKey, TypeFilter};
pub use internship::{Internship, InternshipType, LearningResources, MissingSkill, RawInternship};
pub use profile::{RecommendationRequest, ResumeUpload, UserProfile, UserSession};

#[cfg(test)]
pub(crate) use internship::fixtures;
