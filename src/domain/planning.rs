use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use super::{
    AssignmentId, EntryId, Identifiable, PlanningAPIError, Project, ProjectId,
    Shift, UserId, ValidationError,
};

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];
pub const SLOT_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| ValidationError::new(format!("Invalid date: {value}")))
}

pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, ValidationError> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            ValidationError::new(format!("Invalid date and time: {value}"))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommentType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub message: String,
    #[serde(rename = "commentType")]
    pub comment_type: CommentType,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn warning(user_id: UserId, message: String) -> Self {
        Self {
            user_id,
            message,
            comment_type: CommentType::Warning,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// One concrete scheduled slot of a project. Entries without an id have not
/// been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningEntry {
    pub id: Option<EntryId>,
    #[serde(rename = "projectId")]
    pub project_id: ProjectId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(rename = "employeeIds")]
    pub employee_ids: Vec<UserId>,
    #[serde(rename = "multipleAssignment")]
    pub multiple_assignment: bool,
    pub title: String,
    pub description: Option<String>,
    pub comments: Vec<Comment>,
}

impl PlanningEntry {
    pub fn slot(&self) -> String {
        format!(
            "{} -> {}",
            self.start.format(SLOT_DISPLAY_FORMAT),
            self.end.format(SLOT_DISPLAY_FORMAT)
        )
    }
}

impl Identifiable for PlanningEntry {
    fn id(&self) -> Option<Uuid> {
        self.id.map(|id| *id.as_ref())
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(EntryId::new(id));
    }
}

/// Durable link between one employee and one entry. Cancelled, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningAssignment {
    pub id: AssignmentId,
    #[serde(rename = "entryId")]
    pub entry_id: EntryId,
    #[serde(rename = "employeeId")]
    pub employee_id: UserId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "sendDate")]
    pub send_date: DateTime<Utc>,
    pub cancelled: bool,
}

impl PlanningAssignment {
    pub fn new(entry_id: EntryId, employee_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: AssignmentId::default(),
            entry_id,
            employee_id,
            created_at: now,
            updated_at: None,
            send_date: now,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.updated_at = Some(Utc::now());
    }
}

impl Identifiable for PlanningAssignment {
    fn id(&self) -> Option<Uuid> {
        Some(*self.id.as_ref())
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = AssignmentId::new(id);
    }
}

/// An assignment joined with its entry and, when it still exists, its project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningAssignmentDetail {
    #[serde(flatten)]
    pub assignment: PlanningAssignment,
    pub entry: PlanningEntry,
    pub project: Option<Project>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationUnit {
    Days,
    Weeks,
}

impl FromStr for RotationUnit {
    type Err = PlanningAPIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAYS" => Ok(RotationUnit::Days),
            "WEEKS" => Ok(RotationUnit::Weeks),
            _ => Err(PlanningAPIError::UnknownRotationFrequency(s.to_owned())),
        }
    }
}

/// Recurring-shift specification. Never persisted; expanded into entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningCycle {
    pub project_id: ProjectId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub employee_ids: Vec<UserId>,
    pub multiple_assignment: bool,
    pub title: String,
    pub description: Option<String>,
    pub rotation_frequency: u16,
    pub rotation_unit: RotationUnit,
    pub shifts: Vec<Shift>,
    pub include_saturday: bool,
    pub include_sunday: bool,
}

impl PlanningCycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_id: ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        employee_ids: Vec<UserId>,
        multiple_assignment: bool,
        title: String,
        description: Option<String>,
        rotation_frequency: u16,
        rotation_unit: RotationUnit,
        shifts: Vec<Shift>,
        include_saturday: bool,
        include_sunday: bool,
    ) -> Result<Self, PlanningAPIError> {
        if start > end {
            return Err(PlanningAPIError::StartAfterEnd);
        }
        if rotation_frequency < 1 {
            return Err(ValidationError::new(String::from(
                "Rotation frequency must be at least 1",
            ))
            .into());
        }
        if shifts.is_empty() {
            return Err(ValidationError::new(String::from(
                "A cycle needs at least one shift",
            ))
            .into());
        }
        check_multiple_assignment(&employee_ids, multiple_assignment)?;

        Ok(Self {
            project_id,
            start,
            end,
            employee_ids,
            multiple_assignment,
            title,
            description,
            rotation_frequency,
            rotation_unit,
            shifts,
            include_saturday,
            include_sunday,
        })
    }

    /// Number of consumed dates before the next shift takes over.
    pub fn dates_per_shift(&self) -> usize {
        let frequency = usize::from(self.rotation_frequency);
        match self.rotation_unit {
            RotationUnit::Days => frequency,
            RotationUnit::Weeks => frequency * 7,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut day = self.start;
        while day <= self.end {
            let skipped = match day.weekday() {
                Weekday::Sat => !self.include_saturday,
                Weekday::Sun => !self.include_sunday,
                _ => false,
            };
            if !skipped {
                dates.push(day);
            }
            day += Duration::days(1);
        }
        dates
    }

    /// Expands the cycle into draft entries, one per included date.
    ///
    /// The active shift advances once every `dates_per_shift` emitted dates,
    /// so skipped weekend days do not move the rotation.
    pub fn expand(&self) -> Vec<PlanningEntry> {
        let per_shift = self.dates_per_shift().max(1);
        self.dates()
            .into_iter()
            .enumerate()
            .map(|(idx, date)| {
                let shift = &self.shifts[(idx / per_shift) % self.shifts.len()];
                let (start, end) = shift.instantiate(date);
                PlanningEntry {
                    id: None,
                    project_id: self.project_id,
                    created_at: Utc::now(),
                    updated_at: None,
                    start,
                    end,
                    employee_ids: self.employee_ids.clone(),
                    multiple_assignment: self.multiple_assignment,
                    title: self.title.clone(),
                    description: self.description.clone(),
                    comments: Vec::new(),
                }
            })
            .collect()
    }
}

pub fn check_multiple_assignment(
    employee_ids: &[UserId],
    multiple_assignment: bool,
) -> Result<(), PlanningAPIError> {
    if employee_ids.len() > 1 && !multiple_assignment {
        return Err(PlanningAPIError::MultipleAssignmentNotAllowed);
    }
    Ok(())
}

/// Outcome of a dry-run validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityReport {
    pub valid: bool,
    pub comments: Vec<Comment>,
}

impl Default for ValidityReport {
    fn default() -> Self {
        Self {
            valid: true,
            comments: Vec::new(),
        }
    }
}

impl ValidityReport {
    pub fn reject(&mut self, comment: Comment) {
        self.valid = false;
        self.comments.push(comment);
    }

    pub fn flagged_users(&self) -> HashSet<UserId> {
        self.comments.iter().map(|c| c.user_id).collect()
    }
}
