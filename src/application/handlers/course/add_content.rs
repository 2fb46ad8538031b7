//! AddContentHandler - Adds material to a course section.

use std::sync::Arc;
use tracing::info;

use crate::domain::course::{Content, ContentKind, CourseError, NewContent};
use crate::domain::foundation::{AuthenticatedUser, CourseId, SectionId, Timestamp};
use crate::ports::CourseRepository;

use super::load_course;

#[derive(Debug, Clone)]
pub struct AddContentCommand {
    pub course_id: CourseId,
    pub section_id: SectionId,
    pub title: String,
    pub kind: ContentKind,
    pub body: String,
    pub visible_from: Option<Timestamp>,
}

pub struct AddContentHandler {
    courses: Arc<dyn CourseRepository>,
}

impl AddContentHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Owning teacher only. Content scheduled in the future starts hidden.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: AddContentCommand) -> Result<Content, CourseError> {
        let course = load_course(self.courses.as_ref(), &cmd.course_id).await?;
        if !course.is_owner(&actor.id) {
            return Err(CourseError::Forbidden);
        }
        if !course.has_section(&cmd.section_id) {
            return Err(CourseError::SectionNotFound(cmd.section_id));
        }

        let content = NewContent::new(&cmd.title, cmd.kind, &cmd.body, cmd.visible_from)?
            .into_content(&Timestamp::now());
        self.courses
            .add_content(course.id(), &cmd.section_id, &content)
            .await?;

        if !content.visible {
            info!(
                course_id = %course.id(),
                content_id = %content.id,
                "Content scheduled for later publication"
            );
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{actor, seed_course, seed_user};
    use crate::domain::course::Section;
    use crate::domain::foundation::{InstituteId, Role};

    #[tokio::test]
    async fn scheduled_content_starts_hidden() {
        let store = InMemoryStore::new();
        let teacher = seed_user(&store, "Tom", Role::Teacher, InstituteId::new()).await;
        let course = seed_course(&store, &teacher, "Math").await;
        let section = Section::new("Week 1").unwrap();
        store.add_section(course.id(), &section).await.unwrap();
        let handler = AddContentHandler::new(Arc::new(store.clone()));

        let content = handler
            .handle(
                &actor(&teacher),
                AddContentCommand {
                    course_id: *course.id(),
                    section_id: section.id,
                    title: "Final exam".to_string(),
                    kind: ContentKind::File,
                    body: "exam.pdf".to_string(),
                    visible_from: Some(Timestamp::now().plus_secs(86_400)),
                },
            )
            .await
            .unwrap();

        assert!(!content.visible);
        let stored = store.find_by_id(course.id()).await.unwrap().unwrap();
        assert_eq!(stored.sections()[0].contents, vec![content]);
    }

    #[tokio::test]
    async fn unknown_section_is_not_found() {
        let store = InMemoryStore::new();
        let teacher = seed_user(&store, "Tom", Role::Teacher, InstituteId::new()).await;
        let course = seed_course(&store, &teacher, "Math").await;
        let missing = SectionId::new();

        let result = AddContentHandler::new(Arc::new(store.clone()))
            .handle(
                &actor(&teacher),
                AddContentCommand {
                    course_id: *course.id(),
                    section_id: missing,
                    title: "Notes".to_string(),
                    kind: ContentKind::Text,
                    body: String::new(),
                    visible_from: None,
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), CourseError::SectionNotFound(missing));
    }
}
