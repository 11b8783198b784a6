use serde::{Deserialize, Deserializer, Serialize};

/// Profile fields collected during onboarding; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}

/// The signed-in user, persisted until explicit logout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_onboarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl UserSession {
    /// Merges onboarding answers into the session and marks it onboarded
    ///
    /// Fields left unset in `update` keep their current value.
    pub fn complete_onboarding(&mut self, update: UserProfile) {
        if update.skills.is_some() {
            self.profile.skills = update.skills;
        }
        if update.interests.is_some() {
            self.profile.interests = update.interests;
        }
        if update.location.is_some() {
            self.profile.location = update.location;
        }
        if update.education.is_some() {
            self.profile.education = update.education;
        }
        self.is_onboarded = true;
    }
}

/// Body of `POST /recommend/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub location_preference: Vec<String>,
    pub education: String,
}

impl RecommendationRequest {
    /// Query used by the dashboard: ranked towards the preferred location
    pub fn for_dashboard(profile: &UserProfile) -> Self {
        Self {
            location_preference: profile.location.iter().cloned().collect(),
            ..Self::for_search(profile)
        }
    }

    /// Query used by search: every location, narrowed client-side afterwards
    pub fn for_search(profile: &UserProfile) -> Self {
        Self {
            skills: profile.skills.clone().unwrap_or_default(),
            interests: profile.interests.clone().unwrap_or_default(),
            location_preference: Vec::new(),
            education: profile.education.clone().unwrap_or_default(),
        }
    }
}

/// Acknowledgement returned by the resume upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// The backend hands out integer ids; the client treats them as opaque strings
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
