mod common;

use common::TestApp;
use rango::{
    db::{self, category::PopularCategories},
    models::category::Category,
    populate::{populate, populate_optional, SeedData},
    utils::slug::is_valid_slug,
    AppError,
};

#[tokio::test]
async fn slug_is_derived_on_create() {
    let app = TestApp::new().await;
    let category = app.create_category("how do i create a slug in django", 0, 0).await;
    assert_eq!(category.slug, "how-do-i-create-a-slug-in-django");
}

#[tokio::test]
async fn resaving_without_rename_keeps_slug() {
    let app = TestApp::new().await;
    let category = app.create_category("how do i create a slug in django", 0, 0).await;

    let saved = db::category::save(
        &app.pool,
        &Category {
            likes: 10,
            ..category.clone()
        },
    )
    .await
    .unwrap();

    assert_eq!(saved.slug, category.slug);
    assert_eq!(saved.likes, 10);
}

#[tokio::test]
async fn renaming_rederives_slug() {
    let app = TestApp::new().await;
    let category = app.create_category("Other Frameworks", 0, 0).await;

    let renamed = db::category::save(
        &app.pool,
        &Category {
            name: "Web Frameworks!".into(),
            ..category
        },
    )
    .await
    .unwrap();

    assert_eq!(renamed.slug, "web-frameworks");
    assert!(is_valid_slug(&renamed.slug));
}

#[tokio::test]
async fn slug_collision_is_rejected() {
    let app = TestApp::new().await;
    app.create_category("Rust Tips", 0, 0).await;

    let clash = db::category::create(&app.pool, "rust tips!", 0, 0).await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    let duplicate = db::category::create(&app.pool, "Rust Tips", 0, 0).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn negative_counters_are_rejected() {
    let app = TestApp::new().await;
    let result = db::category::create(&app.pool, "Broken", -1, 0).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn missing_category_lookup_is_none() {
    let app = TestApp::new().await;
    assert!(db::category::find_by_name(&app.pool, "Python").await.unwrap().is_none());
    assert!(db::category::find_by_slug(&app.pool, "python").await.unwrap().is_none());
}

#[tokio::test]
async fn popularity_order_is_stable_and_restartable() {
    let app = TestApp::new().await;
    app.create_category("Cat1", 100, 200).await;
    app.create_category("Cat2", 250, 300).await;
    app.create_category("Cat3", 300, 100).await;
    let cat4 = app.create_category("Cat4", 0, 200).await;

    let query = PopularCategories::all();
    let names = |categories: Vec<Category>| categories.into_iter().map(|c| c.name).collect::<Vec<_>>();

    let first = names(query.fetch_all(&app.pool).await.unwrap());
    assert_eq!(first, ["Cat2", "Cat1", "Cat4", "Cat3"]);

    db::category::increment_likes(&app.pool, cat4.id).await.unwrap();
    let second = names(query.fetch_all(&app.pool).await.unwrap());
    assert_eq!(second, ["Cat2", "Cat4", "Cat1", "Cat3"]);

    let top = names(PopularCategories::top(2).fetch_all(&app.pool).await.unwrap());
    assert_eq!(top, ["Cat2", "Cat1"]);
}

#[tokio::test]
async fn deleting_category_deletes_its_pages() {
    let app = TestApp::new().await;
    let python = app.create_category("Python", 0, 0).await;
    let django = app.create_category("Django", 0, 0).await;
    for title in ["One", "Two", "Three"] {
        db::page::create(&app.pool, python.id, title, "http://python.org", 0).await.unwrap();
    }
    let kept = db::page::create(&app.pool, django.id, "Kept", "http://djangoproject.com", 0)
        .await
        .unwrap();

    assert!(db::category::delete(&app.pool, python.id).await.unwrap());
    assert_eq!(db::page::count_for_category(&app.pool, python.id).await.unwrap(), 0);
    assert!(db::page::find_by_id(&app.pool, kept.id).await.unwrap().is_some());

    assert!(!db::category::delete(&app.pool, python.id).await.unwrap());
}

#[tokio::test]
async fn page_needs_existing_category() {
    let app = TestApp::new().await;
    let result = db::page::create(&app.pool, 42, "Orphan", "http://example.com", 0).await;
    assert!(matches!(result, Err(AppError::NotFound("Category"))));
}

#[tokio::test]
async fn concurrent_likes_are_not_lost() {
    let app = TestApp::new().await;
    let id = app.create_category("Python", 0, 0).await.id;
    const N: usize = 50;

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let pool = app.pool.clone();
            tokio::spawn(async move { db::category::increment_likes(&pool, id).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let category = db::category::find_by_id(&app.pool, id).await.unwrap().unwrap();
    assert_eq!(category.likes, N as i64);
}

#[tokio::test]
async fn concurrent_page_views_are_not_lost() {
    let app = TestApp::new().await;
    let category = app.create_category("Python", 0, 0).await;
    let id = db::page::create(&app.pool, category.id, "Docs", "http://python.org", 0)
        .await
        .unwrap()
        .id;
    const N: usize = 25;

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let pool = app.pool.clone();
            tokio::spawn(async move { db::page::increment_views(&pool, id).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let page = db::page::find_by_id(&app.pool, id).await.unwrap().unwrap();
    assert_eq!(page.views, N as i64);
}

#[tokio::test]
async fn populate_adds_python_category() {
    let app = TestApp::new().await;
    populate(&app.pool, &SeedData::default()).await.unwrap();

    let python = db::category::find_by_name(&app.pool, "Python").await.unwrap().unwrap();
    assert_eq!(python.views, 128);
    assert_eq!(python.likes, 64);
    assert_eq!(python.slug, "python");
}

#[tokio::test]
async fn populate_twice_does_not_duplicate() {
    let app = TestApp::new().await;
    let first = populate(&app.pool, &SeedData::default()).await.unwrap();
    let second = populate(&app.pool, &SeedData::default()).await.unwrap();
    assert_eq!(first, second);

    let categories = PopularCategories::all().fetch_all(&app.pool).await.unwrap();
    assert_eq!(categories.len(), 3);
    let python = db::category::find_by_name(&app.pool, "Python").await.unwrap().unwrap();
    assert_eq!(db::page::count_for_category(&app.pool, python.id).await.unwrap(), 3);
}

#[tokio::test]
async fn failed_populate_leaves_no_rows() {
    let app = TestApp::new().await;
    let data: SeedData = serde_json::from_str(
        r#"{"categories": [{"name": "Rust Tips", "likes": 3}, {"name": "rust tips!"}]}"#,
    )
    .unwrap();

    let result = populate(&app.pool, &data).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(db::category::find_by_name(&app.pool, "Rust Tips").await.unwrap().is_none());
    assert!(PopularCategories::all().fetch_all(&app.pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_seed_file_is_rolled_back() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.json");
    std::fs::write(
        &path,
        r#"{"categories": [
            {"name": "Rust", "pages": [{"title": "Book", "url": "https://doc.rust-lang.org/book/"}]},
            {"name": "Broken", "pages": [{"title": "Bad", "url": "http://example.com/a\nb"}]}
        ]}"#,
    )
    .unwrap();

    assert!(populate_optional(&app.pool, Some(path.as_path())).await.is_none());
    assert!(db::category::find_by_name(&app.pool, "Rust").await.unwrap().is_none());
}

#[tokio::test]
async fn populate_resets_counters_of_existing_category() {
    let app = TestApp::new().await;
    app.create_category("Python", 1, 1).await;
    populate(&app.pool, &SeedData::default()).await.unwrap();

    let python = db::category::find_by_name(&app.pool, "Python").await.unwrap().unwrap();
    assert_eq!((python.views, python.likes), (128, 64));
}

#[tokio::test]
async fn missing_seed_file_degrades_to_warning() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();

    let absent = dir.path().join("absent.json");
    let report = populate_optional(&app.pool, Some(absent.as_path())).await;
    assert!(report.is_none());
    assert!(db::category::find_by_name(&app.pool, "Python").await.unwrap().is_none());

    let index = app.get("/rango/").await;
    assert!(index.body.contains("There are no categories present."));
}

#[tokio::test]
async fn malformed_seed_file_degrades_to_warning() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(populate_optional(&app.pool, Some(path.as_path())).await.is_none());
}

#[tokio::test]
async fn populate_without_file_uses_builtin_data() {
    let app = TestApp::new().await;
    let report = populate_optional(&app.pool, None).await.unwrap();
    assert_eq!(report.categories, 3);
    assert_eq!(report.pages, 8);
}
