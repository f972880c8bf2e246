//! End-to-end flows through both services wired to the in-memory store.
//!
//! These tests exercise the write cascades and the read joins against real
//! documents rather than mocks, so they observe the cross-document effects
//! the unit tests can only assert call-by-call.

use std::sync::Arc;

use chrono::Utc;
use courtyard_core::domain::ports::{
    CommentRepository, EstateRepository, EstateSearch, ListingsQuery, PostRepository,
    ReferenceGraphCommand, UserRepository,
};
use courtyard_core::domain::{
    ErrorKind, Estate, EstateCategory, EstateId, EstateUpdate, FavoriteDecision,
    ListingsQueryService, NewComment, NewEstate, NewPost, Post, PostId, PostUpdate,
    ReferenceGraphService, User, UserId, UserRole,
};
use courtyard_core::outbound::MemoryDocumentStore;

type Graph = ReferenceGraphService<
    MemoryDocumentStore,
    MemoryDocumentStore,
    MemoryDocumentStore,
    MemoryDocumentStore,
>;
type Queries = ListingsQueryService<
    MemoryDocumentStore,
    MemoryDocumentStore,
    MemoryDocumentStore,
    MemoryDocumentStore,
>;

fn wire() -> (Graph, Queries, MemoryDocumentStore) {
    let store = MemoryDocumentStore::new();
    let shared = Arc::new(store.clone());
    let graph = ReferenceGraphService::new(
        Arc::clone(&shared),
        Arc::clone(&shared),
        Arc::clone(&shared),
        Arc::clone(&shared),
    );
    let queries = ListingsQueryService::new(
        Arc::clone(&shared),
        Arc::clone(&shared),
        Arc::clone(&shared),
        shared,
    );
    (graph, queries, store)
}

async fn seed_user(store: &MemoryDocumentStore, username: &str) -> User {
    let user = User::new(
        UserId::random(),
        username,
        format!("{username}@example.com"),
        "+440000000000",
        "hash",
        UserRole::User,
    );
    UserRepository::insert(store, &user).await.expect("seed user");
    user
}

async fn user_doc(store: &MemoryDocumentStore, id: &UserId) -> User {
    UserRepository::find_by_id(store, id)
        .await
        .expect("user lookup")
        .expect("user exists")
}

async fn maybe_estate_doc(store: &MemoryDocumentStore, id: &EstateId) -> Option<Estate> {
    EstateRepository::find_by_id(store, id)
        .await
        .expect("estate lookup")
}

async fn estate_doc(store: &MemoryDocumentStore, id: &EstateId) -> Estate {
    maybe_estate_doc(store, id).await.expect("estate exists")
}

fn apartment(owner: &User, title: &str, price: f64) -> NewEstate {
    NewEstate {
        user_id: owner.id.clone(),
        title: title.to_owned(),
        description: "sunny".to_owned(),
        price,
        square_meters: 55.0,
        total_rooms: 2,
        category: EstateCategory::Apartment,
        floor_number: Some(3),
        images: vec!["front.jpg".to_owned()],
        longitude: 23.7,
        latitude: 37.9,
    }
}

#[tokio::test]
async fn creating_an_estate_links_the_owner_side() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "ada").await;

    let estate = graph
        .create_estate(apartment(&owner, "Loft downtown", 150.0))
        .await
        .expect("estate created");

    let owner = user_doc(&store, &owner.id).await;
    assert_eq!(owner.estate_ids, vec![estate.id]);
}

#[tokio::test]
async fn estate_creation_enforces_the_floor_number_rule() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "ada").await;

    let mut missing_floor = apartment(&owner, "Loft", 100.0);
    missing_floor.floor_number = None;
    let error = graph
        .create_estate(missing_floor)
        .await
        .expect_err("floorless apartment rejected");
    assert_eq!(error.kind(), ErrorKind::Validation);

    let mut villa = apartment(&owner, "Hillside villa", 900.0);
    villa.category = EstateCategory::Villa;
    villa.floor_number = None;
    graph
        .create_estate(villa)
        .await
        .expect("standalone house needs no floor");
}

#[tokio::test]
async fn favorites_stay_symmetric_across_add_and_remove() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let fan = seed_user(&store, "fan").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");

    graph
        .add_favorite(&fan.id, &estate.id)
        .await
        .expect("favorite added");

    let fan_doc = user_doc(&store, &fan.id).await;
    let estate_doc_after_add = estate_doc(&store, &estate.id).await;
    assert_eq!(fan_doc.favorite_estate_ids, vec![estate.id.clone()]);
    assert_eq!(estate_doc_after_add.favorited_by_users_ids, vec![fan.id.clone()]);

    graph
        .remove_favorite(&fan.id, &estate.id)
        .await
        .expect("favorite removed");

    let fan_doc = user_doc(&store, &fan.id).await;
    let estate_doc_after_remove = estate_doc(&store, &estate.id).await;
    assert!(fan_doc.favorite_estate_ids.is_empty());
    assert!(estate_doc_after_remove.favorited_by_users_ids.is_empty());
}

#[tokio::test]
async fn favoriting_twice_conflicts_and_own_estate_is_forbidden() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let fan = seed_user(&store, "fan").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");

    let own = graph
        .add_favorite(&owner.id, &estate.id)
        .await
        .expect_err("own estate");
    assert_eq!(own.kind(), ErrorKind::Forbidden);

    graph
        .add_favorite(&fan.id, &estate.id)
        .await
        .expect("first favorite");
    let dup = graph
        .add_favorite(&fan.id, &estate.id)
        .await
        .expect_err("duplicate favorite");
    assert_eq!(dup.kind(), ErrorKind::Conflict);

    // The dry-run check reports the same outcome without mutating.
    let decision = graph
        .can_favorite(&fan.id, &estate.id)
        .await
        .expect("decision");
    assert_eq!(decision, FavoriteDecision::AlreadyFavorited);
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn removing_an_absent_favorite_is_a_no_op() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let fan = seed_user(&store, "fan").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");

    graph
        .remove_favorite(&fan.id, &estate.id)
        .await
        .expect("absent favorite removal succeeds");
}

#[tokio::test]
async fn deleting_an_estate_cascades_through_posts_comments_and_favorites() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let fan = seed_user(&store, "fan").await;
    let commenter = seed_user(&store, "commenter").await;

    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");
    graph
        .add_favorite(&fan.id, &estate.id)
        .await
        .expect("favorite added");
    let post = graph
        .create_post(NewPost {
            author_id: fan.id.clone(),
            estate_id: Some(estate.id.clone()),
            title: "Is the area quiet?".to_owned(),
            content: "Considering an offer.".to_owned(),
        })
        .await
        .expect("post created");
    let comment = graph
        .create_comment(NewComment {
            author_id: commenter.id.clone(),
            post_id: post.id.clone(),
            content: "Very quiet after 8pm.".to_owned(),
        })
        .await
        .expect("comment created");

    graph.delete_estate(&estate.id).await.expect("cascade");

    assert!(maybe_estate_doc(&store, &estate.id).await.is_none());
    assert!(
        PostRepository::find_by_id(&store, &post.id)
            .await
            .expect("post lookup")
            .is_none()
    );
    assert!(
        CommentRepository::find_by_id(&store, &comment.id)
            .await
            .expect("comment lookup")
            .is_none()
    );

    let owner = user_doc(&store, &owner.id).await;
    let fan = user_doc(&store, &fan.id).await;
    let commenter = user_doc(&store, &commenter.id).await;
    assert!(owner.estate_ids.is_empty());
    assert!(fan.favorite_estate_ids.is_empty());
    assert!(fan.post_ids.is_empty());
    assert!(commenter.comment_ids.is_empty());
}

#[tokio::test]
async fn deleting_a_post_detaches_it_from_estate_and_author() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let author = seed_user(&store, "author").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");
    let post = graph
        .create_post(NewPost {
            author_id: author.id.clone(),
            estate_id: Some(estate.id.clone()),
            title: "Parking situation".to_owned(),
            content: "Any garages nearby?".to_owned(),
        })
        .await
        .expect("post created");

    graph.delete_post(&post.id).await.expect("post deleted");

    let estate = estate_doc(&store, &estate.id).await;
    let author = user_doc(&store, &author.id).await;
    assert!(estate.post_ids.is_empty());
    assert!(author.post_ids.is_empty());
}

#[tokio::test]
async fn updates_are_restricted_to_the_owning_actor() {
    let (graph, _, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let stranger = seed_user(&store, "stranger").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");
    let post = graph
        .create_post(NewPost {
            author_id: owner.id.clone(),
            estate_id: None,
            title: "General question".to_owned(),
            content: "body".to_owned(),
        })
        .await
        .expect("post created");

    let estate_err = graph
        .update_estate(
            &stranger.id,
            &estate.id,
            EstateUpdate {
                title: Some("Hijacked".to_owned()),
                ..EstateUpdate::default()
            },
        )
        .await
        .expect_err("stranger cannot update estate");
    assert_eq!(estate_err.kind(), ErrorKind::Forbidden);

    let post_err = graph
        .update_post(
            &stranger.id,
            &post.id,
            PostUpdate {
                title: Some("Hijacked".to_owned()),
                ..PostUpdate::default()
            },
        )
        .await
        .expect_err("stranger cannot update post");
    assert_eq!(post_err.kind(), ErrorKind::Forbidden);

    let updated = graph
        .update_estate(
            &owner.id,
            &estate.id,
            EstateUpdate {
                price: Some(135.0),
                ..EstateUpdate::default()
            },
        )
        .await
        .expect("owner updates estate");
    assert!((updated.price - 135.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn estate_search_pages_within_a_price_band() {
    let (graph, queries, store) = wire();
    let owner = seed_user(&store, "owner").await;

    for index in 0..8_u8 {
        let price = 80.0 + f64::from(index) * 20.0;
        graph
            .create_estate(apartment(&owner, &format!("Estate {index}"), price))
            .await
            .expect("estate created");
    }

    // Prices 100..=200 match six of the eight estates.
    let search = EstateSearch {
        price_min: Some(100.0),
        price_max: Some(200.0),
        ..EstateSearch::default()
    };
    let first = queries
        .search_estates(search.clone(), 0, 5)
        .await
        .expect("first page");
    assert_eq!(first.total_length, 6);
    assert_eq!(first.data.len(), 5);

    let second = queries
        .search_estates(search, 5, 5)
        .await
        .expect("second page");
    assert_eq!(second.total_length, 6);
    assert_eq!(second.data.len(), 1);
    for estate in first.data.iter().chain(second.data.iter()) {
        assert!(estate.price >= 100.0 && estate.price <= 200.0);
    }
}

#[tokio::test]
async fn owned_and_favorite_listings_reflect_the_graph() {
    let (graph, queries, store) = wire();
    let owner = seed_user(&store, "owner").await;
    let fan = seed_user(&store, "fan").await;
    let estate = graph
        .create_estate(apartment(&owner, "Loft", 120.0))
        .await
        .expect("estate created");
    graph
        .add_favorite(&fan.id, &estate.id)
        .await
        .expect("favorite added");

    let owned = queries
        .list_estates_for_user(&owner.id, 1, 10)
        .await
        .expect("owned page");
    assert_eq!(owned.total_length, 1);

    let favorites = queries
        .list_favorite_estates_for_user(&fan.id, 1, 10)
        .await
        .expect("favorites page");
    assert_eq!(
        favorites.data.first().map(|estate| estate.id.clone()),
        Some(estate.id)
    );

    let missing = queries
        .list_favorite_estates_for_user(&UserId::random(), 1, 10)
        .await
        .expect_err("unknown user");
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn post_listing_joins_authors_and_tolerates_dangling_ones() {
    let (graph, queries, store) = wire();
    let author = seed_user(&store, "author").await;
    graph
        .create_post(NewPost {
            author_id: author.id.clone(),
            estate_id: None,
            title: "Attached author".to_owned(),
            content: "body".to_owned(),
        })
        .await
        .expect("post created");

    // A document whose author was purged out from under it.
    let orphan = Post::from_new(
        PostId::random(),
        NewPost {
            author_id: UserId::random(),
            estate_id: None,
            title: "Orphaned post".to_owned(),
            content: "body".to_owned(),
        },
        Utc::now(),
    );
    PostRepository::insert(&store, &orphan)
        .await
        .expect("orphan inserted");

    let page = queries.list_posts(None, 1, 10).await.expect("page");
    assert_eq!(page.total_length, 2);
    let orphan_view = page
        .data
        .iter()
        .find(|view| view.post.id == orphan.id)
        .expect("orphan listed");
    assert!(orphan_view.author.is_none());
    let attached_view = page
        .data
        .iter()
        .find(|view| view.post.id != orphan.id)
        .expect("attached listed");
    assert_eq!(
        attached_view.author.as_ref().map(|a| a.username.clone()),
        Some("author".to_owned())
    );
}

#[tokio::test]
async fn comment_listing_pages_within_a_post() {
    let (graph, queries, store) = wire();
    let author = seed_user(&store, "author").await;
    let post = graph
        .create_post(NewPost {
            author_id: author.id.clone(),
            estate_id: None,
            title: "Busy thread".to_owned(),
            content: "body".to_owned(),
        })
        .await
        .expect("post created");

    for index in 0..3 {
        graph
            .create_comment(NewComment {
                author_id: author.id.clone(),
                post_id: post.id.clone(),
                content: format!("comment {index}"),
            })
            .await
            .expect("comment created");
    }

    let page = queries
        .list_comments_for_post(&post.id, 1, 2)
        .await
        .expect("page");
    assert_eq!(page.total_length, 3);
    assert_eq!(page.data.len(), 2);

    let bad = queries
        .list_comments_for_post(&post.id, 0, 0)
        .await
        .expect_err("zero limit");
    assert_eq!(bad.kind(), ErrorKind::Validation);
}
