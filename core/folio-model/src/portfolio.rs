use folio_types::{sanitize, FeatureId, LinkId, ProjectId, SectionId};
use serde::{Deserialize, Serialize};

/// An owner's public profile.
///
/// Every field is owner-authored and untrusted. [`ProfileData::sanitized`]
/// produces the copy that is safe to interpolate into rendered markup;
/// callers on the public path must not use the raw fields directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
}

impl ProfileData {
    /// Returns a copy with every field stripped of markup-unsafe characters.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize(&self.name),
            photo: sanitize(&self.photo),
            email: sanitize(&self.email),
            telephone: sanitize(&self.telephone),
            role: sanitize(&self.role),
            tagline: sanitize(&self.tagline),
            description: sanitize(&self.description),
        }
    }
}

/// An ordered group of projects.
///
/// Order is persisted creation order; there is no position column, and
/// reordering is not part of the public snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub projects: Vec<ProjectData>,
}

impl SectionData {
    /// Returns a copy with all nested owner-authored text sanitized.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            id: self.id,
            title: sanitize(&self.title),
            projects: self.projects.iter().map(ProjectData::sanitized).collect(),
        }
    }
}

/// A single project with its links and feature bullets.
///
/// `description` defaults to the empty string and the child collections
/// default to empty lists: the normalized view model never carries an
/// absent field, so renderers need no null checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<LinkData>,
    #[serde(default)]
    pub features: Vec<FeatureData>,
}

impl ProjectData {
    /// Returns a copy with all owner-authored text sanitized.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            id: self.id,
            title: sanitize(&self.title),
            description: sanitize(&self.description),
            links: self
                .links
                .iter()
                .map(|link| LinkData {
                    id: link.id,
                    title: sanitize(&link.title),
                    url: sanitize(&link.url),
                })
                .collect(),
            features: self
                .features
                .iter()
                .map(|feature| FeatureData {
                    id: feature.id,
                    title: sanitize(&feature.title),
                })
                .collect(),
        }
    }
}

/// An external link attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub id: LinkId,
    pub title: String,
    pub url: String,
}

/// A feature bullet attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureData {
    pub id: FeatureId,
    pub title: String,
}
