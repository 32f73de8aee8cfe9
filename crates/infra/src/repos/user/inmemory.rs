use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use events_api_domain::{User, ID};

pub struct InMemoryUserRepo {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        if !insert_unless(user, &self.users, |u| u.email == user.email) {
            anyhow::bail!("A user with email {} already exists", user.email);
        }
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        find(user_id, &self.users)
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        Ok(find_by(&self.users, |u| user_ids.contains(&u.id)))
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        find_by(&self.users, |u| u.email == email).into_iter().next()
    }
}
