//! Integration tests for the fair lifecycle service: CRUD, liveness
//! status, invite-code rotation, and the liveness-gated fair-scoped
//! booth/job surface.

use chrono::{Duration, Utc};
use fairground_core::error::FairgroundError;
use fairground_core::models::company::CreateCompany;
use fairground_core::models::enrollment::UpdateFairBooth;
use fairground_core::models::user::{CreateUser, UserRole};
use fairground_core::repository::{
    CompanyRepository, FairRepository, Pagination, UserRepository,
};
use fairground_db::repository::{
    SurrealBoothRepository, SurrealCompanyRepository, SurrealEnrollmentRepository,
    SurrealFairBoothRepository, SurrealFairJobRepository, SurrealFairRepository,
    SurrealJobRepository, SurrealUserRepository,
};
use fairground_fairs::{
    CreateFairRequest, EnrollInput, EnrollmentService, FairService, LiveSource, NewFairJob,
    UpdateFairRequest,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

type Service = FairService<
    SurrealUserRepository<Db>,
    SurrealCompanyRepository<Db>,
    SurrealFairRepository<Db>,
    SurrealFairBoothRepository<Db>,
    SurrealFairJobRepository<Db>,
>;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fairground_db::run_migrations(&db).await.unwrap();
    db
}

fn service(db: &Surreal<Db>) -> Service {
    FairService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
        SurrealFairRepository::new(db.clone()),
        SurrealFairBoothRepository::new(db.clone()),
        SurrealFairJobRepository::new(db.clone()),
    )
}

async fn create_user(db: &Surreal<Db>, role: UserRole, email: &str) -> Uuid {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            role,
            name: "Test User".into(),
            email: email.into(),
            company_id: None,
        })
        .await
        .unwrap()
        .id
}

fn plain_fair(name: &str) -> CreateFairRequest {
    CreateFairRequest {
        name: name.into(),
        description: None,
        start_time: None,
        end_time: None,
    }
}

/// Enroll a company so the fair has a booth to gate.
async fn enroll_company(db: &Surreal<Db>, fair_id: Uuid, requested_by: Uuid) -> (Uuid, Uuid) {
    let company = SurrealCompanyRepository::new(db.clone())
        .create(CreateCompany {
            company_name: "ACME Robotics".into(),
            owner_id: requested_by,
            invite_code: None,
        })
        .await
        .unwrap()
        .id;
    let enrollments = EnrollmentService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
        SurrealBoothRepository::new(db.clone()),
        SurrealJobRepository::new(db.clone()),
        SurrealFairRepository::new(db.clone()),
        SurrealEnrollmentRepository::new(db.clone()),
    );
    let out = enrollments
        .enroll(EnrollInput {
            fair_id: Some(fair_id),
            invite_code: None,
            company_id: Some(company),
            requested_by,
        })
        .await
        .unwrap();
    (company, out.booth_id)
}

#[tokio::test]
async fn create_fair_generates_invite_code() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let fair = svc
        .create_fair(plain_fair("Spring Career Fair"), admin)
        .await
        .unwrap();

    assert_eq!(fair.invite_code.len(), 8);
    assert!(
        fair.invite_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
    assert!(!fair.is_live, "fairs start offline");
    assert_eq!(fair.created_by, admin);
}

#[tokio::test]
async fn create_fair_requires_admin() {
    let db = setup().await;
    let svc = service(&db);
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    let err = svc
        .create_fair(plain_fair("Student Fair"), student)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn create_fair_validates_input() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let err = svc.create_fair(plain_fair("   "), admin).await.unwrap_err();
    assert!(matches!(err, FairgroundError::Validation { .. }));

    let now = Utc::now();
    let err = svc
        .create_fair(
            CreateFairRequest {
                name: "Backwards".into(),
                description: None,
                start_time: Some(now + Duration::hours(2)),
                end_time: Some(now),
            },
            admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::Validation { .. }));
}

#[tokio::test]
async fn scheduled_window_drives_status() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let now = Utc::now();
    let fair = svc
        .create_fair(
            CreateFairRequest {
                name: "Scheduled Fair".into(),
                description: None,
                start_time: Some(now - Duration::hours(1)),
                end_time: Some(now + Duration::hours(1)),
            },
            admin,
        )
        .await
        .unwrap();

    let status = svc.status(fair.id).await.unwrap();
    assert!(status.is_live);
    assert_eq!(status.source, LiveSource::Schedule);

    // Same read twice — no writes in between, same answer.
    let again = svc.status(fair.id).await.unwrap();
    assert_eq!(again.is_live, status.is_live);
    assert_eq!(again.source, status.source);
}

#[tokio::test]
async fn expired_window_is_not_live() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let now = Utc::now();
    let fair = svc
        .create_fair(
            CreateFairRequest {
                name: "Past Fair".into(),
                description: None,
                start_time: Some(now - Duration::hours(3)),
                end_time: Some(now - Duration::hours(1)),
            },
            admin,
        )
        .await
        .unwrap();

    let status = svc.status(fair.id).await.unwrap();
    assert!(!status.is_live);
    assert_eq!(status.source, LiveSource::Manual);
}

#[tokio::test]
async fn manual_toggle_wins_over_expired_schedule() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let now = Utc::now();
    let fair = svc
        .create_fair(
            CreateFairRequest {
                name: "Encore Fair".into(),
                description: None,
                start_time: Some(now - Duration::hours(3)),
                end_time: Some(now - Duration::hours(1)),
            },
            admin,
        )
        .await
        .unwrap();

    let toggled = svc.toggle_live(fair.id, admin).await.unwrap();
    assert!(toggled.is_live);

    let status = svc.status(fair.id).await.unwrap();
    assert!(status.is_live);
    assert_eq!(status.source, LiveSource::Manual);

    // Toggling again flips it back off.
    let toggled = svc.toggle_live(fair.id, admin).await.unwrap();
    assert!(!toggled.is_live);
    assert!(!svc.status(fair.id).await.unwrap().is_live);
}

#[tokio::test]
async fn status_of_unknown_fair_is_not_found() {
    let db = setup().await;
    let svc = service(&db);

    let err = svc.status(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn refresh_invite_code_invalidates_the_old_one() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let fair = svc.create_fair(plain_fair("Rotating"), admin).await.unwrap();
    let old_code = fair.invite_code.clone();

    let rotated = svc.refresh_invite_code(fair.id, admin).await.unwrap();
    assert_ne!(rotated.invite_code, old_code);
    assert_eq!(rotated.invite_code.len(), 8);

    let fairs = SurrealFairRepository::new(db.clone());
    let err = fairs.get_by_invite_code(&old_code).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
    assert_eq!(
        fairs
            .get_by_invite_code(&rotated.invite_code)
            .await
            .unwrap()
            .id,
        fair.id
    );
}

#[tokio::test]
async fn update_fair_edits_and_clears_fields() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    let fair = svc
        .create_fair(
            CreateFairRequest {
                name: "Before".into(),
                description: Some("old blurb".into()),
                start_time: None,
                end_time: None,
            },
            admin,
        )
        .await
        .unwrap();

    let updated = svc
        .update_fair(
            fair.id,
            UpdateFairRequest {
                name: Some("After".into()),
                description: Some(None),
                ..Default::default()
            },
            admin,
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After");
    assert!(updated.description.is_none());
    assert_eq!(updated.invite_code, fair.invite_code, "update never rotates the code");

    let student = create_user(&db, UserRole::Student, "student@example.com").await;
    let err = svc
        .update_fair(fair.id, UpdateFairRequest::default(), student)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn delete_fair_requires_admin_and_then_404s() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    let fair = svc.create_fair(plain_fair("Doomed"), admin).await.unwrap();

    let err = svc.delete_fair(fair.id, student).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    svc.delete_fair(fair.id, admin).await.unwrap();
    let err = svc.get_fair(fair.id).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));

    let err = svc.delete_fair(fair.id, admin).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn list_fairs_is_public() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;

    svc.create_fair(plain_fair("One"), admin).await.unwrap();
    svc.create_fair(plain_fair("Two"), admin).await.unwrap();

    let page = svc.list_fairs(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn booth_listing_is_gated_by_liveness() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    let fair = svc.create_fair(plain_fair("Gated"), admin).await.unwrap();
    enroll_company(&db, fair.id, owner).await;

    // Fair is offline: anonymous and student callers are denied,
    // administrators bypass the gate.
    let err = svc.list_booths(fair.id, None).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
    let err = svc.list_booths(fair.id, Some(student)).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
    assert_eq!(svc.list_booths(fair.id, Some(admin)).await.unwrap().len(), 1);

    // Toggle live: everyone sees the booths.
    svc.toggle_live(fair.id, admin).await.unwrap();
    assert_eq!(svc.list_booths(fair.id, None).await.unwrap().len(), 1);
    assert_eq!(
        svc.list_booths(fair.id, Some(student)).await.unwrap().len(),
        1
    );

    // Same gate on the job listing.
    assert!(svc.list_jobs(fair.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn booth_update_is_gated_and_stays_fair_local() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    let fair = svc.create_fair(plain_fair("Editable"), admin).await.unwrap();
    let (_company, booth_id) = enroll_company(&db, fair.id, owner).await;

    let err = svc
        .update_booth(
            fair.id,
            booth_id,
            UpdateFairBooth {
                description: Some(Some("hacked".into())),
                ..Default::default()
            },
            student,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    let updated = svc
        .update_booth(
            fair.id,
            booth_id,
            UpdateFairBooth {
                description: Some(Some("Visit us in hall 3".into())),
                ..Default::default()
            },
            owner,
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Visit us in hall 3"));
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn fair_job_create_and_delete_are_gated() {
    let db = setup().await;
    let svc = service(&db);
    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    let fair = svc.create_fair(plain_fair("Jobs"), admin).await.unwrap();
    let (company, _booth_id) = enroll_company(&db, fair.id, owner).await;

    let request = NewFairJob {
        company_id: company,
        title: "Fair-only Internship".into(),
        description: None,
        location: None,
        employment_type: Some("Internship".into()),
        apply_url: None,
    };

    let err = svc
        .create_job(fair.id, request.clone(), student)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    let job = svc.create_job(fair.id, request, owner).await.unwrap();
    assert_eq!(job.company_id, company);
    assert!(job.source_job_id.is_none());

    let err = svc.delete_job(fair.id, job.id, student).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    svc.delete_job(fair.id, job.id, admin).await.unwrap();
    svc.toggle_live(fair.id, admin).await.unwrap();
    assert!(svc.list_jobs(fair.id, None).await.unwrap().is_empty());
}
