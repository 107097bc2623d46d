use hypecast_campaign::{CampaignEngine, EngineError};
use hypecast_core::InvitationRepository;
use hypecast_shared::{Campaign, CampaignStatus, CreatorListing, InvitationStatus, Platform};
use hypecast_store::MemoryStore;
use std::sync::Arc;
use uuid::Uuid;

fn engine(store: &Arc<MemoryStore>) -> CampaignEngine {
    CampaignEngine::new(store.clone(), store.clone(), store.clone())
}

/// Draft campaign with enough seeded inventory to launch; target of 2.
async fn launched_campaign(store: &Arc<MemoryStore>, target: i32, inventory: usize) -> Campaign {
    let mut campaign = Campaign::new(
        Uuid::new_v4(),
        "Lifecycle",
        10_000,
        50_000,
        1_000,
        10_000,
        target,
    );
    campaign.platforms.insert(Platform::Instagram);
    campaign.content_formats.insert("post".to_string());
    store.seed_campaign(campaign.clone());

    for i in 0..inventory {
        store.seed_listing(
            CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
                .with_format_price("post", 20_000 + i as i64 * 1_000),
        );
    }

    engine(store)
        .launch(campaign.id, campaign.advertiser_id)
        .await
        .unwrap();
    campaign
}

async fn set_statuses(store: &Arc<MemoryStore>, campaign_id: Uuid, statuses: &[InvitationStatus]) {
    let invitations = store.list_by_campaign(campaign_id).await.unwrap();
    for (invitation, status) in invitations.iter().zip(statuses) {
        store
            .update_invitation_status(invitation.id, *status)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_acceptances_advance_active_to_in_progress() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 4).await; // invites min(3, 4) = 3
    let engine = engine(&store);

    set_statuses(
        &store,
        campaign.id,
        &[InvitationStatus::Accepted, InvitationStatus::Pending, InvitationStatus::Pending],
    )
    .await;
    engine.update_stats(campaign.id).await.unwrap();

    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert_eq!(snap.status, CampaignStatus::Active);
    assert_eq!(snap.accepted_offers_count, 1);

    set_statuses(
        &store,
        campaign.id,
        &[InvitationStatus::Accepted, InvitationStatus::Accepted, InvitationStatus::Pending],
    )
    .await;
    engine.update_stats(campaign.id).await.unwrap();

    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert_eq!(snap.status, CampaignStatus::InProgress);
    assert_eq!(snap.accepted_offers_count, 2);
}

#[tokio::test]
async fn test_update_stats_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 4).await;
    let engine = engine(&store);

    set_statuses(
        &store,
        campaign.id,
        &[InvitationStatus::Accepted, InvitationStatus::Declined, InvitationStatus::Pending],
    )
    .await;

    engine.update_stats(campaign.id).await.unwrap();
    let first = store.campaign_snapshot(campaign.id).unwrap();

    engine.update_stats(campaign.id).await.unwrap();
    let second = store.campaign_snapshot(campaign.id).unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.sent_offers_count, second.sent_offers_count);
    assert_eq!(first.accepted_offers_count, second.accepted_offers_count);
    assert_eq!(first.completed_offers_count, second.completed_offers_count);
}

#[tokio::test]
async fn test_all_settled_invitations_complete_the_campaign() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 3).await; // invites 3
    let engine = engine(&store);

    // Two complete, one declines: everything terminal.
    set_statuses(
        &store,
        campaign.id,
        &[
            InvitationStatus::Completed,
            InvitationStatus::Completed,
            InvitationStatus::Declined,
        ],
    )
    .await;
    engine.update_stats(campaign.id).await.unwrap();

    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert_eq!(snap.status, CampaignStatus::Completed);
    assert_eq!(snap.accepted_offers_count, 2);
    assert_eq!(snap.completed_offers_count, 2);
}

#[tokio::test]
async fn test_open_invitations_keep_campaign_in_progress() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 3).await;
    let engine = engine(&store);

    set_statuses(
        &store,
        campaign.id,
        &[
            InvitationStatus::Completed,
            InvitationStatus::Completed,
            InvitationStatus::Pending,
        ],
    )
    .await;
    engine.update_stats(campaign.id).await.unwrap();

    assert_eq!(
        store.campaign_snapshot(campaign.id).unwrap().status,
        CampaignStatus::InProgress
    );
}

#[tokio::test]
async fn test_paused_campaign_does_not_auto_advance() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 4).await;
    let engine = engine(&store);

    engine.pause(campaign.id).await.unwrap();

    set_statuses(
        &store,
        campaign.id,
        &[InvitationStatus::Accepted, InvitationStatus::Accepted, InvitationStatus::Pending],
    )
    .await;
    engine.update_stats(campaign.id).await.unwrap();

    // Counters refresh, status holds.
    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert_eq!(snap.status, CampaignStatus::Paused);
    assert_eq!(snap.accepted_offers_count, 2);

    // Resume honors what happened while paused.
    engine.resume(campaign.id).await.unwrap();
    assert_eq!(
        store.campaign_snapshot(campaign.id).unwrap().status,
        CampaignStatus::InProgress
    );
}

#[tokio::test]
async fn test_resume_below_target_returns_to_active() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 4).await;
    let engine = engine(&store);

    engine.pause(campaign.id).await.unwrap();
    engine.resume(campaign.id).await.unwrap();

    assert_eq!(
        store.campaign_snapshot(campaign.id).unwrap().status,
        CampaignStatus::Active
    );
}

#[tokio::test]
async fn test_pause_requires_running_campaign() {
    let store = Arc::new(MemoryStore::new());
    let mut draft = Campaign::new(Uuid::new_v4(), "Draft", 10_000, 50_000, 1_000, 10_000, 2);
    draft.platforms.insert(Platform::Instagram);
    draft.content_formats.insert("post".to_string());
    store.seed_campaign(draft.clone());

    let err = engine(&store).pause(draft.id).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidState { action: "pause", status: CampaignStatus::Draft }
    ));
}

#[tokio::test]
async fn test_cancel_expires_pending_invitations() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 3).await;
    let engine = engine(&store);

    set_statuses(
        &store,
        campaign.id,
        &[InvitationStatus::Accepted, InvitationStatus::Pending, InvitationStatus::Pending],
    )
    .await;

    engine.cancel(campaign.id).await.unwrap();

    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert_eq!(snap.status, CampaignStatus::Cancelled);

    for invitation in store.list_by_campaign(campaign.id).await.unwrap() {
        assert_ne!(invitation.status, InvitationStatus::Pending);
    }
    // The accepted one is untouched.
    let statuses: Vec<InvitationStatus> = store
        .list_by_campaign(campaign.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.status)
        .collect();
    assert!(statuses.contains(&InvitationStatus::Accepted));

    // Terminal campaigns cannot be cancelled again.
    let err = engine.cancel(campaign.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));
}

#[tokio::test]
async fn test_close_ends_campaign_early_and_expires_pendings() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 3).await;
    let engine = engine(&store);

    engine.close(campaign.id).await.unwrap();

    assert_eq!(
        store.campaign_snapshot(campaign.id).unwrap().status,
        CampaignStatus::Closed
    );
    for invitation in store.list_by_campaign(campaign.id).await.unwrap() {
        assert_eq!(invitation.status, InvitationStatus::Expired);
    }
}

#[tokio::test]
async fn test_delete_is_soft_and_hides_the_campaign() {
    let store = Arc::new(MemoryStore::new());
    let campaign = launched_campaign(&store, 2, 3).await;
    let engine = engine(&store);

    engine.delete(campaign.id).await.unwrap();

    let snap = store.campaign_snapshot(campaign.id).unwrap();
    assert!(snap.is_deleted);
    assert_eq!(snap.status, CampaignStatus::Cancelled);
    for invitation in store.list_by_campaign(campaign.id).await.unwrap() {
        assert_ne!(invitation.status, InvitationStatus::Pending);
    }

    // Deleted campaigns are gone from the engine's point of view.
    let err = engine.update_stats(campaign.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
