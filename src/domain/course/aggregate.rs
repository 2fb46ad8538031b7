//! Course aggregate.

use crate::domain::foundation::{
    AuthenticatedUser, CourseId, InstituteId, SectionId, Timestamp, UserId, ValidationError,
};
use crate::domain::user::{CourseLink, MemberLink};

use super::content::{validate_title, Content, Section};
use super::CourseError;

pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// A course owned by one teacher, holding its member list and section tree.
///
/// # Invariants
///
/// - `members` holds each user at most once
/// - every member's student record links back to this course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    institute_id: InstituteId,
    teacher_id: UserId,
    name: String,
    description: String,
    members: Vec<MemberLink>,
    sections: Vec<Section>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Course {
    pub fn new(
        institute_id: InstituteId,
        teacher_id: UserId,
        name: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let name = validate_title(name).map_err(|e| match e {
            ValidationError::EmptyField { .. } => ValidationError::empty_field("name"),
            ValidationError::OutOfRange { min, max, actual, .. } => {
                ValidationError::out_of_range("name", min, max, actual)
            }
            other => other,
        })?;
        let description = description.trim();
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::out_of_range(
                "description",
                0,
                MAX_DESCRIPTION_LENGTH as i64,
                len as i64,
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: CourseId::new(),
            institute_id,
            teacher_id,
            name,
            description: description.to_string(),
            members: Vec::new(),
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a course from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CourseId,
        institute_id: InstituteId,
        teacher_id: UserId,
        name: String,
        description: String,
        members: Vec<MemberLink>,
        sections: Vec<Section>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            institute_id,
            teacher_id,
            name,
            description,
            members,
            sections,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    pub fn institute_id(&self) -> &InstituteId {
        &self.institute_id
    }

    pub fn teacher_id(&self) -> &UserId {
        &self.teacher_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn members(&self) -> &[MemberLink] {
        &self.members
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.teacher_id == user_id
    }

    /// Owner, or ADMIN/DIRECTOR with authority over the course's institute.
    pub fn can_be_managed_by(&self, actor: &AuthenticatedUser) -> bool {
        self.is_owner(&actor.id) || actor.can_manage_institute(&self.institute_id)
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.id == user_id)
    }

    /// The link stored on role records pointing at this course.
    pub fn link(&self) -> CourseLink {
        CourseLink::new(self.id, self.name.clone())
    }

    /// Adds a member; returns false if already enrolled.
    pub fn add_member(&mut self, member: MemberLink) -> bool {
        if self.is_member(&member.id) {
            return false;
        }
        self.members.push(member);
        self.touch();
        true
    }

    /// Removes a member; returns whether it was enrolled.
    pub fn remove_member(&mut self, user_id: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| &m.id != user_id);
        let removed = self.members.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
        self.touch();
    }

    /// Appends content to a section.
    ///
    /// # Errors
    ///
    /// - `SectionNotFound` if the section is not part of this course
    pub fn add_content(&mut self, section_id: &SectionId, content: Content) -> Result<(), CourseError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| &s.id == section_id)
            .ok_or(CourseError::SectionNotFound(*section_id))?;
        section.contents.push(content);
        self.touch();
        Ok(())
    }

    pub fn has_section(&self, section_id: &SectionId) -> bool {
        self.sections.iter().any(|s| &s.id == section_id)
    }

    /// Makes every due content visible and returns how many changed.
    pub fn publish_due(&mut self, now: &Timestamp) -> usize {
        let mut published = 0;
        for content in self.sections.iter_mut().flat_map(|s| s.contents.iter_mut()) {
            if content.is_due(now) {
                content.visible = true;
                published += 1;
            }
        }
        if published > 0 {
            self.touch();
        }
        published
    }

    /// Earliest schedule among hidden contents.
    pub fn next_publication(&self) -> Option<Timestamp> {
        self.sections
            .iter()
            .flat_map(|s| s.contents.iter())
            .filter(|c| !c.visible)
            .filter_map(|c| c.visible_from)
            .min()
    }

    /// Copy with hidden contents removed, as students see it.
    pub fn visible_view(&self) -> Course {
        let mut view = self.clone();
        for section in &mut view.sections {
            section.contents.retain(|c| c.visible);
        }
        view
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
