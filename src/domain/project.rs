use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{Identifiable, ProjectId, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<ProjectId>,
    #[serde(rename = "projectName")]
    pub name: ProjectName,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub archived: bool,
    #[serde(rename = "projectType")]
    pub project_type: ProjectType,
}

impl Project {
    pub fn new(name: ProjectName, project_type: ProjectType) -> Self {
        Self {
            id: None,
            name,
            description: None,
            created_at: Utc::now(),
            updated_at: None,
            archived: false,
            project_type,
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Uuid> {
        self.id.map(|id| *id.as_ref())
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(ProjectId::new(id));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().chars().count() {
            x if x < 1 => Err(eyre!("Project name cannot be empty")),
            x if x > 255 => Err(eyre!("Max name length is 255 characters")),
            _ => Ok(Self(name.trim().to_owned())),
        }
    }
}

impl AsRef<String> for ProjectName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl TryFrom<String> for ProjectName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<ProjectName> for String {
    fn from(name: ProjectName) -> Self {
        name.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "WORK")]
    Work,
    #[serde(rename = "HOLIDAYS")]
    Holidays,
    #[serde(rename = "SICKNESS")]
    Sickness,
    #[serde(rename = "ABSENCE")]
    Absence,
}

impl FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORK" => Ok(ProjectType::Work),
            "HOLIDAYS" => Ok(ProjectType::Holidays),
            "SICKNESS" => Ok(ProjectType::Sickness),
            "ABSENCE" => Ok(ProjectType::Absence),
            _ => Err(ValidationError::new(format!("Invalid project type: {s}"))),
        }
    }
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Work => "WORK",
            ProjectType::Holidays => "HOLIDAYS",
            ProjectType::Sickness => "SICKNESS",
            ProjectType::Absence => "ABSENCE",
        }
    }
}
