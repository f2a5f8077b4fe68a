use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contract shape of a posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full-time" => Ok(EmploymentType::FullTime),
            "part-time" => Ok(EmploymentType::PartTime),
            "contract" => Ok(EmploymentType::Contract),
            "internship" => Ok(EmploymentType::Internship),
            other => Err(UnknownVariant::new("employment type", other)),
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteType {
    #[default]
    Remote,
    OnSite,
    Hybrid,
}

impl RemoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::Remote => "remote",
            RemoteType::OnSite => "on-site",
            RemoteType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for RemoteType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(RemoteType::Remote),
            "on-site" => Ok(RemoteType::OnSite),
            "hybrid" => Ok(RemoteType::Hybrid),
            other => Err(UnknownVariant::new("remote type", other)),
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Location {
    /// "City, Country" with blank parts dropped. `None` when both are blank.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A disability a posting declares support for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disability {
    pub id: i64,
    pub name: String,
}

/// A job posting with its requirements and disability support eagerly attached.
///
/// Read-only for the duration of a ranking or chat-selection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub employment_type: EmploymentType,
    pub remote_type: RemoteType,
    pub company: Option<Company>,
    pub location: Option<Location>,
    pub requirements: Vec<String>,
    pub disability_support: Vec<Disability>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Requirements joined with single spaces, in posting order.
    pub fn requirements_text(&self) -> String {
        self.requirements.join(" ")
    }

    pub fn disability_names(&self) -> impl Iterator<Item = &str> {
        self.disability_support.iter().map(|d| d.name.as_str())
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }
}
