//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::{
    AddContentHandler, AddSectionHandler, ChangeRoleHandler, CreateCourseHandler, CreateUserHandler,
    DeleteCourseHandler, DeleteUserHandler, EnrollStudentHandler, GetCourseHandler, GetKolbResultHandler,
    GetSurveySummaryHandler, GetUserHandler, ListCoursesHandler, ListUsersHandler, LoginHandler,
    SubmitKolbTestHandler, SubmitSurveyHandler, UnenrollStudentHandler,
};
use crate::ports::{
    CourseRepository, KolbRepository, PasswordHasher, RoleRecordRepository, RoleTransitionStore,
    SessionValidator, SurveyRepository, TokenIssuer, UserRepository,
};

/// Settings for the `access_token` cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Adds the `Secure` attribute.
    pub secure: bool,
}

/// Port handles shared by every request, built once at startup.
///
/// Handlers are created on demand from the shared ports.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub records: Arc<dyn RoleRecordRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub kolb: Arc<dyn KolbRepository>,
    pub surveys: Arc<dyn SurveyRepository>,
    pub transitions: Arc<dyn RoleTransitionStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub sessions: Arc<dyn SessionValidator>,
    pub cookie: CookieSettings,
}

impl AppState {
    /// State whose persistence ports are all served by one store.
    pub fn from_store<S>(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        sessions: Arc<dyn SessionValidator>,
        cookie: CookieSettings,
    ) -> Self
    where
        S: UserRepository
            + RoleRecordRepository
            + CourseRepository
            + KolbRepository
            + SurveyRepository
            + RoleTransitionStore
            + 'static,
    {
        Self {
            users: store.clone(),
            records: store.clone(),
            courses: store.clone(),
            kolb: store.clone(),
            surveys: store.clone(),
            transitions: store,
            hasher,
            tokens,
            sessions,
            cookie,
        }
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn create_user_handler(&self) -> CreateUserHandler {
        CreateUserHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn get_user_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.users.clone(), self.records.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone())
    }

    pub fn change_role_handler(&self) -> ChangeRoleHandler {
        ChangeRoleHandler::new(
            self.users.clone(),
            self.records.clone(),
            self.courses.clone(),
            self.transitions.clone(),
        )
    }

    pub fn delete_user_handler(&self) -> DeleteUserHandler {
        DeleteUserHandler::new(
            self.users.clone(),
            self.records.clone(),
            self.courses.clone(),
            self.transitions.clone(),
        )
    }

    pub fn create_course_handler(&self) -> CreateCourseHandler {
        CreateCourseHandler::new(self.courses.clone())
    }

    pub fn get_course_handler(&self) -> GetCourseHandler {
        GetCourseHandler::new(self.courses.clone())
    }

    pub fn list_courses_handler(&self) -> ListCoursesHandler {
        ListCoursesHandler::new(self.courses.clone())
    }

    pub fn delete_course_handler(&self) -> DeleteCourseHandler {
        DeleteCourseHandler::new(self.courses.clone())
    }

    pub fn enroll_student_handler(&self) -> EnrollStudentHandler {
        EnrollStudentHandler::new(self.courses.clone(), self.users.clone())
    }

    pub fn unenroll_student_handler(&self) -> UnenrollStudentHandler {
        UnenrollStudentHandler::new(self.courses.clone())
    }

    pub fn add_section_handler(&self) -> AddSectionHandler {
        AddSectionHandler::new(self.courses.clone())
    }

    pub fn add_content_handler(&self) -> AddContentHandler {
        AddContentHandler::new(self.courses.clone())
    }

    pub fn submit_kolb_handler(&self) -> SubmitKolbTestHandler {
        SubmitKolbTestHandler::new(self.kolb.clone())
    }

    pub fn get_kolb_result_handler(&self) -> GetKolbResultHandler {
        GetKolbResultHandler::new(self.kolb.clone(), self.users.clone())
    }

    pub fn submit_survey_handler(&self) -> SubmitSurveyHandler {
        SubmitSurveyHandler::new(self.courses.clone(), self.surveys.clone())
    }

    pub fn survey_summary_handler(&self) -> GetSurveySummaryHandler {
        GetSurveySummaryHandler::new(self.courses.clone(), self.surveys.clone())
    }
}
