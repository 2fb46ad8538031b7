//! ListUsersHandler - Query handler for institute rosters.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, InstituteId, Role};
use crate::domain::user::{User, UserError};
use crate::ports::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    /// ADMIN only; `None` lists every institute.
    pub institute_id: Option<InstituteId>,
    pub role: Option<Role>,
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, actor: &AuthenticatedUser, query: ListUsersQuery) -> Result<Vec<User>, UserError> {
        let institute = match actor.role {
            Role::Admin => query.institute_id,
            Role::Director => match query.institute_id {
                Some(id) if id != actor.institute_id => return Err(UserError::Forbidden),
                _ => Some(actor.institute_id),
            },
            Role::Teacher | Role::Student => return Err(UserError::Forbidden),
        };
        Ok(self.users.list(institute.as_ref(), query.role).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{actor, seed_user};

    #[tokio::test]
    async fn director_sees_own_institute_filtered_by_role() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = seed_user(&store, "Dora", Role::Director, institute).await;
        seed_user(&store, "Sam", Role::Student, institute).await;
        seed_user(&store, "Tom", Role::Teacher, institute).await;
        seed_user(&store, "Out", Role::Student, InstituteId::new()).await;
        let handler = ListUsersHandler::new(Arc::new(store.clone()));

        let students = handler
            .handle(
                &actor(&director),
                ListUsersQuery {
                    institute_id: None,
                    role: Some(Role::Student),
                },
            )
            .await
            .unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].first_name(), "Sam");
    }

    #[tokio::test]
    async fn admin_lists_everyone() {
        let store = InMemoryStore::new();
        let admin = seed_user(&store, "Root", Role::Admin, InstituteId::new()).await;
        seed_user(&store, "Sam", Role::Student, InstituteId::new()).await;
        let handler = ListUsersHandler::new(Arc::new(store.clone()));

        let all = handler.handle(&actor(&admin), ListUsersQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn director_cannot_list_another_institute() {
        let store = InMemoryStore::new();
        let director = seed_user(&store, "Dora", Role::Director, InstituteId::new()).await;
        let handler = ListUsersHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(
                &actor(&director),
                ListUsersQuery {
                    institute_id: Some(InstituteId::new()),
                    role: None,
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), UserError::Forbidden);
    }
}
