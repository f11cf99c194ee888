//! Integration tests for campaign persistence.
//!
//! Exercises the repository layer against a real database:
//! - Transactional create with persona/character links and merge fields
//! - Missing or soft-deleted references rolling back the whole insert
//! - Live relation counts and list filters
//! - Idempotent archive / unpublish / soft delete
//! - Detail hydration with default character images

use assert_matches::assert_matches;
use postforge_core::campaign::{
    Cadence, CampaignStatus, Frequency, PostLength, PostType, StoredPostType, VideoLength,
    Weekday,
};
use postforge_core::merge_field::MergeFieldValueType;
use postforge_core::validation::{CampaignDraft, MergeFieldDraft};
use postforge_db::error::StorageError;
use postforge_db::models::campaign::{CampaignFilter, CreateCampaign};
use postforge_db::models::character::{CreateCharacter, CreateCharacterAsset};
use postforge_db::models::persona::CreatePersona;
use postforge_db::repositories::{CampaignRepo, CharacterRepo, PersonaRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_persona(pool: &PgPool, key: &str, label: &str) {
    PersonaRepo::create(
        pool,
        &CreatePersona {
            key: key.to_string(),
            label: label.to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
}

async fn seed_character(pool: &PgPool, id: &str, name: &str) -> String {
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

fn draft(title: &str, personas: &[&str], characters: &[&str]) -> CampaignDraft {
    CampaignDraft {
        title: title.to_string(),
        objective: "Grow awareness".to_string(),
        narrative_context: None,
        post_length: PostLength::Short,
        start_date: None,
        end_date: None,
        cadence: Cadence::new([Weekday::Monday], Frequency::Weekly),
        post_type: PostType::Image,
        video_length: None,
        personas: personas.iter().map(|p| p.to_string()).collect(),
        characters: characters.iter().map(|c| c.to_string()).collect(),
        merge_fields: None,
    }
}

async fn create(pool: &PgPool, draft: CampaignDraft) -> i64 {
    CampaignRepo::create(pool, &CreateCampaign::from_draft(draft, None))
        .await
        .unwrap()
        .campaign
        .id
}

async fn campaign_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_links_relations_and_starts_as_draft(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;

    let created = CampaignRepo::create(
        &pool,
        &CreateCampaign::from_draft(
            draft("Launch", &["p1"], &[hero.as_str()]),
            Some("user-1".into()),
        ),
    )
    .await
    .unwrap();

    assert_eq!(created.campaign.title, "Launch");
    assert_eq!(created.campaign.post_type, StoredPostType::SingleImage);
    assert_eq!(created.campaign.creator_id.as_deref(), Some("user-1"));
    assert!(!created.campaign.is_active);
    assert!(!created.campaign.is_archived);
    assert_eq!(created.persona_keys, vec!["p1".to_string()]);
    assert_eq!(created.character_ids, vec!["hero".to_string()]);

    let listed = CampaignRepo::find_many(&pool, &CampaignFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].status(chrono::Utc::now().date_naive()),
        CampaignStatus::Draft
    );
    assert_eq!(listed[0].persona_count, 1);
    assert_eq!(listed[0].character_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_video_campaign_with_merge_fields(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;

    let mut d = draft("Clip", &["p1"], &[hero.as_str()]);
    d.post_type = PostType::Video;
    d.video_length = Some(VideoLength::Thirty);
    d.merge_fields = Some(vec![
        MergeFieldDraft {
            name: "headline".into(),
            description: Some("Opening line".into()),
            value_type: MergeFieldValueType::Text,
            default_value: None,
            start_time: 0,
            end_time: 5,
        },
        MergeFieldDraft {
            name: "logo".into(),
            description: None,
            value_type: MergeFieldValueType::Image,
            default_value: Some("logo.png".into()),
            start_time: 20,
            end_time: 30,
        },
    ]);
    let id = create(&pool, d).await;

    let detail = CampaignRepo::find_detail(&pool, id)
        .await
        .unwrap()
        .unwrap()
        .view(chrono::Utc::now().date_naive());
    assert_eq!(detail.campaign.record.video_length, Some(VideoLength::Thirty));
    assert_eq!(detail.campaign.ui_post_type, PostType::Video);

    let fields: Vec<_> = detail
        .merge_fields
        .iter()
        .map(|f| (f.field.name.as_str(), f.field.value_type, f.duration))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("headline", MergeFieldValueType::Text, 5),
            ("logo", MergeFieldValueType::Image, 10),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_persona_rolls_back_everything(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;

    let result = CampaignRepo::create(
        &pool,
        &CreateCampaign::from_draft(draft("Launch", &["p1", "ghost"], &[hero.as_str()]), None),
    )
    .await;

    assert_matches!(
        result,
        Err(StorageError::MissingReference { entity: "persona", ref keys })
            if keys == &vec!["ghost".to_string()]
    );
    assert_eq!(campaign_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_character_is_a_missing_reference(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let gone = seed_character(&pool, "gone", "Gone").await;
    CharacterRepo::soft_delete(&pool, &gone).await.unwrap();

    let result = CampaignRepo::create(
        &pool,
        &CreateCampaign::from_draft(draft("Launch", &["p1"], &[gone.as_str()]), None),
    )
    .await;

    assert_matches!(
        result,
        Err(StorageError::MissingReference { entity: "character", .. })
    );
    assert_eq!(campaign_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counts_skip_soft_deleted_references(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    seed_persona(&pool, "p2", "Students").await;
    let a = seed_character(&pool, "a", "A").await;
    let b = seed_character(&pool, "b", "B").await;
    let id = create(&pool, draft("Launch", &["p1", "p2"], &[a.as_str(), b.as_str()])).await;

    PersonaRepo::soft_delete(&pool, "p2").await.unwrap();
    CharacterRepo::soft_delete(&pool, &b).await.unwrap();

    let listed = CampaignRepo::find_many(&pool, &CampaignFilter::default())
        .await
        .unwrap();
    let row = listed.iter().find(|c| c.record.id == id).unwrap();
    assert_eq!(row.persona_count, 1);
    assert_eq!(row.character_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_by_most_recent_update(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;
    let first = create(&pool, draft("First", &["p1"], &[hero.as_str()])).await;
    let second = create(&pool, draft("Second", &["p1"], &[hero.as_str()])).await;

    // Touching the older campaign moves it to the top.
    CampaignRepo::set_active(&pool, first, true).await.unwrap();

    let ids: Vec<_> = CampaignRepo::find_many(&pool, &CampaignFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.record.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filters_archived_active_and_search(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;
    let spring = create(&pool, draft("Spring Launch", &["p1"], &[hero.as_str()])).await;
    let summer = create(&pool, draft("Summer Sale", &["p1"], &[hero.as_str()])).await;
    CampaignRepo::set_archived(&pool, summer, true).await.unwrap();
    CampaignRepo::set_active(&pool, spring, true).await.unwrap();

    let ids = |rows: Vec<postforge_db::models::campaign::CampaignSummary>| -> Vec<i64> {
        rows.into_iter().map(|c| c.record.id).collect()
    };

    let without_archived = CampaignRepo::find_many(
        &pool,
        &CampaignFilter {
            include_archived: false,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ids(without_archived), vec![spring]);

    let inactive = CampaignRepo::find_many(
        &pool,
        &CampaignFilter {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ids(inactive), vec![summer]);

    let searched = CampaignRepo::find_many(
        &pool,
        &CampaignFilter {
            search: Some("  sale ".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ids(searched), vec![summer]);
}

// ---------------------------------------------------------------------------
// Lifecycle updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_is_idempotent_and_keeps_updated_at(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;
    let id = create(&pool, draft("Launch", &["p1"], &[hero.as_str()])).await;

    assert!(CampaignRepo::set_archived(&pool, id, true).await.unwrap());
    let after_first = CampaignRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(after_first.is_archived);

    assert!(CampaignRepo::set_archived(&pool, id, true).await.unwrap());
    let after_second = CampaignRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(after_first.updated_at, after_second.updated_at);
    assert_eq!(
        after_second.status(chrono::Utc::now().date_naive()),
        CampaignStatus::Archived
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_id_reports_not_found(pool: PgPool) {
    assert!(!CampaignRepo::set_archived(&pool, 9999, true).await.unwrap());
    assert!(!CampaignRepo::set_active(&pool, 9999, false).await.unwrap());
    assert!(!CampaignRepo::soft_delete(&pool, 9999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_campaign_and_is_repeatable(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let hero = seed_character(&pool, "hero", "Hero").await;
    let id = create(&pool, draft("Launch", &["p1"], &[hero.as_str()])).await;

    assert!(CampaignRepo::soft_delete(&pool, id).await.unwrap());
    assert!(CampaignRepo::soft_delete(&pool, id).await.unwrap());

    assert!(CampaignRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(CampaignRepo::find_detail(&pool, id).await.unwrap().is_none());
    assert!(CampaignRepo::find_many(&pool, &CampaignFilter::default())
        .await
        .unwrap()
        .is_empty());

    // Flags can no longer be toggled on a deleted campaign.
    assert!(!CampaignRepo::set_archived(&pool, id, true).await.unwrap());
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_resolves_default_images(pool: PgPool) {
    seed_persona(&pool, "p1", "Parents").await;
    let with_primary = seed_character(&pool, "alpha", "Alpha").await;
    let without_primary = seed_character(&pool, "beta", "Beta").await;
    let bare = seed_character(&pool, "gamma", "Gamma").await;

    let asset = |url: &str, is_primary: bool| CreateCharacterAsset {
        storage_url: url.to_string(),
        is_primary,
    };
    CharacterRepo::add_asset(&pool, &with_primary, &asset("a-old.png", false))
        .await
        .unwrap();
    CharacterRepo::add_asset(&pool, &with_primary, &asset("a-primary.png", true))
        .await
        .unwrap();
    let oldest = CharacterRepo::add_asset(&pool, &without_primary, &asset("b-1.png", false))
        .await
        .unwrap();
    CharacterRepo::add_asset(&pool, &without_primary, &asset("b-2.png", false))
        .await
        .unwrap();

    let characters = [with_primary.as_str(), without_primary.as_str(), bare.as_str()];
    let id = create(&pool, draft("Launch", &["p1"], &characters)).await;
    let detail = CampaignRepo::find_detail(&pool, id).await.unwrap().unwrap();

    let images: Vec<_> = detail
        .characters
        .iter()
        .map(|c| {
            (
                c.character.name.as_str(),
                c.default_image.as_ref().map(|a| a.storage_url.as_str()),
            )
        })
        .collect();
    assert_eq!(
        images,
        vec![
            ("Alpha", Some("a-primary.png")),
            ("Beta", Some("b-1.png")),
            ("Gamma", None),
        ]
    );

    CharacterRepo::soft_delete_asset(&pool, oldest.id).await.unwrap();
    let beta = CharacterRepo::find_by_id(&pool, &without_primary)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        beta.default_image.map(|a| a.storage_url),
        Some("b-2.png".to_string())
    );
}
