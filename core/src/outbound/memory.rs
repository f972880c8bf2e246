//! In-memory document store adapter.
//!
//! Implements the four collection repository ports over process-local hash
//! maps behind a single `RwLock`. The store is constructed explicitly at
//! startup and shared by cloning the handle; there is no lazy global. It
//! backs the integration tests and local tooling, and mirrors the
//! per-document write model of the real store: every save replaces a whole
//! document, and nothing here is transactional across documents.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use pagination::Window;
use tracing::debug;

use crate::domain::comment::Comment;
use crate::domain::estate::Estate;
use crate::domain::id::{CommentId, EstateId, PostId, UserId};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, EstateRepository, EstateRepositoryError,
    EstateSearchFilter, PostRepository, PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::post::Post;
use crate::domain::user::User;

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<UserId, User>,
    estates: HashMap<EstateId, Estate>,
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
}

/// Shared in-memory document store.
///
/// Cloning the store clones the handle, not the data; all clones observe
/// the same collections, matching the long-lived shared connection the
/// services expect.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> Result<T, String> {
        self.inner
            .read()
            .map(|guard| f(&guard))
            .map_err(|_| "store lock poisoned".to_owned())
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> Result<T, String> {
        self.inner
            .write()
            .map(|mut guard| f(&mut guard))
            .map_err(|_| "store lock poisoned".to_owned())
    }
}

fn window_slice<T>(mut items: Vec<T>, window: Window) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = usize::try_from(window.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
    if skip >= items.len() {
        return (Vec::new(), total);
    }
    items.drain(..skip);
    items.truncate(limit);
    (items, total)
}

/// Newest-first ordering with the id as a deterministic tie-break.
macro_rules! sort_newest_first {
    ($items:expr) => {
        $items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        })
    };
}

#[async_trait]
impl UserRepository for MemoryDocumentStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        self.read(|c| c.users.get(id).cloned())
            .map_err(UserRepositoryError::query)
    }

    async fn find_many_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        self.read(|c| {
            ids.iter()
                .filter_map(|id| c.users.get(id).cloned())
                .collect()
        })
        .map_err(UserRepositoryError::query)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let user = user.clone();
        self.write(|c| {
            if c.users.contains_key(&user.id) {
                return Err(format!("duplicate user id {}", user.id));
            }
            c.users.insert(user.id.clone(), user);
            Ok(())
        })
        .map_err(UserRepositoryError::query)?
        .map_err(UserRepositoryError::query)
    }

    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let user = user.clone();
        self.write(|c| {
            c.users.insert(user.id.clone(), user);
        })
        .map_err(UserRepositoryError::query)
    }
}

#[async_trait]
impl EstateRepository for MemoryDocumentStore {
    async fn find_by_id(&self, id: &EstateId) -> Result<Option<Estate>, EstateRepositoryError> {
        self.read(|c| c.estates.get(id).cloned())
            .map_err(EstateRepositoryError::query)
    }

    async fn find_many_by_ids(
        &self,
        ids: &[EstateId],
    ) -> Result<Vec<Estate>, EstateRepositoryError> {
        self.read(|c| {
            ids.iter()
                .filter_map(|id| c.estates.get(id).cloned())
                .collect()
        })
        .map_err(EstateRepositoryError::query)
    }

    async fn insert(&self, estate: &Estate) -> Result<(), EstateRepositoryError> {
        let estate = estate.clone();
        self.write(|c| {
            if c.estates.contains_key(&estate.id) {
                return Err(format!("duplicate estate id {}", estate.id));
            }
            c.estates.insert(estate.id.clone(), estate);
            Ok(())
        })
        .map_err(EstateRepositoryError::query)?
        .map_err(EstateRepositoryError::query)
    }

    async fn save(&self, estate: &Estate) -> Result<(), EstateRepositoryError> {
        let estate = estate.clone();
        self.write(|c| {
            c.estates.insert(estate.id.clone(), estate);
        })
        .map_err(EstateRepositoryError::query)
    }

    async fn delete(&self, id: &EstateId) -> Result<bool, EstateRepositoryError> {
        let removed = self
            .write(|c| c.estates.remove(id).is_some())
            .map_err(EstateRepositoryError::query)?;
        debug!(%id, removed, "estate document delete");
        Ok(removed)
    }

    async fn search(
        &self,
        filter: &EstateSearchFilter,
        window: Window,
    ) -> Result<(Vec<Estate>, u64), EstateRepositoryError> {
        let mut matches = self
            .read(|c| {
                c.estates
                    .values()
                    .filter(|estate| filter.matches(estate))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .map_err(EstateRepositoryError::query)?;
        sort_newest_first!(matches);
        Ok(window_slice(matches, window))
    }
}

#[async_trait]
impl PostRepository for MemoryDocumentStore {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        self.read(|c| c.posts.get(id).cloned())
            .map_err(PostRepositoryError::query)
    }

    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let post = post.clone();
        self.write(|c| {
            if c.posts.contains_key(&post.id) {
                return Err(format!("duplicate post id {}", post.id));
            }
            c.posts.insert(post.id.clone(), post);
            Ok(())
        })
        .map_err(PostRepositoryError::query)?
        .map_err(PostRepositoryError::query)
    }

    async fn save(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let post = post.clone();
        self.write(|c| {
            c.posts.insert(post.id.clone(), post);
        })
        .map_err(PostRepositoryError::query)
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let removed = self
            .write(|c| c.posts.remove(id).is_some())
            .map_err(PostRepositoryError::query)?;
        debug!(%id, removed, "post document delete");
        Ok(removed)
    }

    async fn find_by_estate(
        &self,
        estate_id: &EstateId,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        self.read(|c| {
            c.posts
                .values()
                .filter(|post| post.estate_id.as_ref() == Some(estate_id))
                .cloned()
                .collect()
        })
        .map_err(PostRepositoryError::query)
    }

    async fn search_by_title(
        &self,
        title_substring: Option<String>,
        window: Window,
    ) -> Result<(Vec<Post>, u64), PostRepositoryError> {
        let needle = title_substring.map(|needle| needle.to_lowercase());
        let mut matches = self
            .read(|c| {
                c.posts
                    .values()
                    .filter(|post| {
                        needle
                            .as_ref()
                            .is_none_or(|needle| post.title.to_lowercase().contains(needle))
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .map_err(PostRepositoryError::query)?;
        sort_newest_first!(matches);
        Ok(window_slice(matches, window))
    }
}

#[async_trait]
impl CommentRepository for MemoryDocumentStore {
    async fn find_by_id(
        &self,
        id: &CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        self.read(|c| c.comments.get(id).cloned())
            .map_err(CommentRepositoryError::query)
    }

    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let comment = comment.clone();
        self.write(|c| {
            if c.comments.contains_key(&comment.id) {
                return Err(format!("duplicate comment id {}", comment.id));
            }
            c.comments.insert(comment.id.clone(), comment);
            Ok(())
        })
        .map_err(CommentRepositoryError::query)?
        .map_err(CommentRepositoryError::query)
    }

    async fn save(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let comment = comment.clone();
        self.write(|c| {
            c.comments.insert(comment.id.clone(), comment);
        })
        .map_err(CommentRepositoryError::query)
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError> {
        let removed = self
            .write(|c| c.comments.remove(id).is_some())
            .map_err(CommentRepositoryError::query)?;
        debug!(%id, removed, "comment document delete");
        Ok(removed)
    }

    async fn find_by_post(
        &self,
        post_id: &PostId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        self.read(|c| {
            c.comments
                .values()
                .filter(|comment| &comment.post_id == post_id)
                .cloned()
                .collect()
        })
        .map_err(CommentRepositoryError::query)
    }

    async fn page_by_post(
        &self,
        post_id: &PostId,
        window: Window,
    ) -> Result<(Vec<Comment>, u64), CommentRepositoryError> {
        let mut matches = self
            .read(|c| {
                c.comments
                    .values()
                    .filter(|comment| &comment.post_id == post_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .map_err(CommentRepositoryError::query)?;
        sort_newest_first!(matches);
        Ok(window_slice(matches, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::estate::{EstateCategory, NewEstate};
    use crate::domain::post::NewPost;
    use crate::domain::user::UserRole;
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn estate_at(minutes_ago: i64, title: &str) -> Estate {
        Estate::from_new(
            EstateId::random(),
            NewEstate {
                user_id: UserId::random(),
                title: title.to_owned(),
                description: String::new(),
                price: 100.0,
                square_meters: 40.0,
                total_rooms: 2,
                category: EstateCategory::Apartment,
                floor_number: Some(1),
                images: vec![],
                longitude: 0.0,
                latitude: 0.0,
            },
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn user_insert_then_find_round_trips() {
        let store = MemoryDocumentStore::new();
        let user = User::new(
            UserId::random(),
            "ada",
            "ada@example.com",
            "+44123",
            "hash",
            UserRole::User,
        );
        UserRepository::insert(&store, &user).await.expect("insert");
        let found = UserRepository::find_by_id(&store, &user.id)
            .await
            .expect("lookup");
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn duplicate_user_insert_is_rejected() {
        let store = MemoryDocumentStore::new();
        let user = User::new(
            UserId::random(),
            "ada",
            "ada@example.com",
            "+44123",
            "hash",
            UserRole::User,
        );
        UserRepository::insert(&store, &user).await.expect("insert");
        let error = UserRepository::insert(&store, &user)
            .await
            .expect_err("duplicate rejected");
        assert!(error.to_string().contains("duplicate user id"));
    }

    #[tokio::test]
    async fn estate_search_sorts_newest_first_and_counts_before_pagination() {
        let store = MemoryDocumentStore::new();
        for (age, title) in [(30, "Old loft"), (20, "Middle loft"), (10, "New loft")] {
            EstateRepository::insert(&store, &estate_at(age, title))
                .await
                .expect("insert");
        }

        let window = Window::new(0, 2).expect("valid window");
        let (slice, total) = store
            .search(&EstateSearchFilter::default(), window)
            .await
            .expect("search");

        assert_eq!(total, 3);
        let titles: Vec<_> = slice.iter().map(|estate| estate.title.as_str()).collect();
        assert_eq!(titles, vec!["New loft", "Middle loft"]);
    }

    #[tokio::test]
    async fn window_past_the_end_yields_an_empty_slice_with_the_full_total() {
        let store = MemoryDocumentStore::new();
        EstateRepository::insert(&store, &estate_at(1, "Only"))
            .await
            .expect("insert");

        let window = Window::new(10, 5).expect("valid window");
        let (slice, total) = store
            .search(&EstateSearchFilter::default(), window)
            .await
            .expect("search");
        assert!(slice.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn post_title_search_is_case_insensitive() {
        let store = MemoryDocumentStore::new();
        let post = Post::from_new(
            PostId::random(),
            NewPost {
                author_id: UserId::random(),
                estate_id: None,
                title: "Riverside Questions".to_owned(),
                content: "noise levels?".to_owned(),
            },
            Utc::now(),
        );
        PostRepository::insert(&store, &post).await.expect("insert");

        let window = Window::new(0, 10).expect("valid window");
        let (slice, total) = store
            .search_by_title(Some("RIVERSIDE".to_owned()), window)
            .await
            .expect("search");
        assert_eq!(total, 1);
        assert_eq!(slice.first().map(|p| p.id.clone()), Some(post.id));
    }

    #[rstest]
    fn clones_share_the_same_collections() {
        let store = MemoryDocumentStore::new();
        let clone = store.clone();
        store
            .write(|c| {
                c.users.insert(
                    UserId::random(),
                    User::new(
                        UserId::random(),
                        "ada",
                        "a@b.c",
                        "1",
                        "hash",
                        UserRole::User,
                    ),
                );
            })
            .expect("write");
        let count = clone.read(|c| c.users.len()).expect("read");
        assert_eq!(count, 1);
    }
}
