//! Integration tests for the fair-scoped booth and job repositories —
//! fork isolation and scoped CRUD.

use fairground_core::error::FairgroundError;
use fairground_core::models::booth::{CreateBooth, UpdateBooth};
use fairground_core::models::enrollment::{
    CreateEnrollment, CreateFairBooth, CreateFairJob, EnrollmentMethod, UpdateFairBooth,
    UpdateFairJob,
};
use fairground_core::repository::{
    BoothRepository, EnrollmentRepository, FairBoothRepository, FairJobRepository,
};
use fairground_db::repository::{
    SurrealBoothRepository, SurrealEnrollmentRepository, SurrealFairBoothRepository,
    SurrealFairJobRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fairground_db::run_migrations(&db).await.unwrap();
    db
}

/// Enroll a company with a minimal booth snapshot; returns the booth id.
async fn enroll_company<C: surrealdb::Connection>(
    enrollments: &SurrealEnrollmentRepository<C>,
    fair_id: Uuid,
    company_id: Uuid,
) -> Uuid {
    let enrolled_by = Uuid::new_v4();
    let booth = CreateFairBooth {
        id: Uuid::new_v4(),
        fair_id,
        company_id,
        company_name: "ACME Robotics".into(),
        industry: Some("Robotics".into()),
        company_size: None,
        location: Some("Berlin".into()),
        description: None,
        logo_url: None,
        website: None,
        careers_page: None,
        contact_name: None,
        contact_email: None,
        hiring_for: vec![],
        enrolled_by,
    };
    let booth_id = booth.id;
    enrollments
        .enroll_with_snapshot(
            CreateEnrollment {
                fair_id,
                company_id,
                company_name: "ACME Robotics".into(),
                method: EnrollmentMethod::Admin,
                booth_id: Some(booth_id),
                enrolled_by,
            },
            booth,
            vec![],
        )
        .await
        .unwrap();
    booth_id
}

#[tokio::test]
async fn fair_booth_edits_do_not_touch_the_global_booth() {
    let db = setup().await;
    let booths = SurrealBoothRepository::new(db.clone());
    let enrollments = SurrealEnrollmentRepository::new(db.clone());
    let fair_booths = SurrealFairBoothRepository::new(db);

    let company_id = Uuid::new_v4();
    let global = booths
        .create(CreateBooth {
            company_id,
            company_name: Some("ACME Robotics".into()),
            industry: Some("Robotics".into()),
            company_size: None,
            location: Some("Berlin".into()),
            description: None,
            logo_url: None,
            website: None,
            careers_page: None,
            contact_name: None,
            contact_email: None,
            hiring_for: vec![],
        })
        .await
        .unwrap();

    let fair_id = Uuid::new_v4();
    let fair_booth_id = enroll_company(&enrollments, fair_id, company_id).await;

    let updated = fair_booths
        .update(
            fair_id,
            fair_booth_id,
            UpdateFairBooth {
                location: Some(Some("Munich (fair hall 3)".into())),
                description: Some(Some("Visit us at the fair!".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.location.as_deref(), Some("Munich (fair hall 3)"));
    assert!(updated.updated_at.is_some(), "edit stamps updated_at");

    // The canonical booth kept its own values.
    let global_after = booths.get_by_id(global.id).await.unwrap();
    assert_eq!(global_after.location.as_deref(), Some("Berlin"));
    assert!(global_after.description.is_none());
}

#[tokio::test]
async fn fair_booth_edits_do_not_leak_into_other_fairs() {
    let db = setup().await;
    let enrollments = SurrealEnrollmentRepository::new(db.clone());
    let fair_booths = SurrealFairBoothRepository::new(db);

    let company_id = Uuid::new_v4();
    let fair_a = Uuid::new_v4();
    let fair_b = Uuid::new_v4();
    let booth_a = enroll_company(&enrollments, fair_a, company_id).await;
    let booth_b = enroll_company(&enrollments, fair_b, company_id).await;

    fair_booths
        .update(
            fair_a,
            booth_a,
            UpdateFairBooth {
                company_name: Some("ACME (Fair A special)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let untouched = fair_booths.get_by_id(fair_b, booth_b).await.unwrap();
    assert_eq!(untouched.company_name, "ACME Robotics");
    assert!(untouched.updated_at.is_none());
}

#[tokio::test]
async fn fair_booth_get_is_scoped_to_its_fair() {
    let db = setup().await;
    let enrollments = SurrealEnrollmentRepository::new(db.clone());
    let fair_booths = SurrealFairBoothRepository::new(db);

    let fair_id = Uuid::new_v4();
    let booth_id = enroll_company(&enrollments, fair_id, Uuid::new_v4()).await;

    // The right fair finds it; a different fair id does not.
    assert!(fair_booths.get_by_id(fair_id, booth_id).await.is_ok());
    let err = fair_booths
        .get_by_id(Uuid::new_v4(), booth_id)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn fair_job_crud_roundtrip() {
    let db = setup().await;
    let fair_jobs = SurrealFairJobRepository::new(db);

    let fair_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();

    let job = fair_jobs
        .create(CreateFairJob {
            fair_id,
            company_id,
            source_job_id: None,
            title: "Fair-only Internship".into(),
            description: None,
            location: Some("On-site".into()),
            employment_type: Some("Internship".into()),
            apply_url: None,
        })
        .await
        .unwrap();
    assert_eq!(job.fair_id, fair_id);
    assert!(job.source_job_id.is_none());

    let updated = fair_jobs
        .update(
            fair_id,
            job.id,
            UpdateFairJob {
                title: Some("Fair-only Internship (extended)".into()),
                apply_url: Some(Some("https://acme.example/apply".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Fair-only Internship (extended)");
    assert_eq!(updated.apply_url.as_deref(), Some("https://acme.example/apply"));

    fair_jobs.delete(fair_id, job.id).await.unwrap();
    let err = fair_jobs.get_by_id(fair_id, job.id).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn global_booth_update_roundtrip() {
    let db = setup().await;
    let booths = SurrealBoothRepository::new(db);

    let booth = booths
        .create(CreateBooth {
            company_id: Uuid::new_v4(),
            company_name: None,
            industry: None,
            company_size: None,
            location: None,
            description: None,
            logo_url: None,
            website: None,
            careers_page: None,
            contact_name: None,
            contact_email: None,
            hiring_for: vec![],
        })
        .await
        .unwrap();

    let updated = booths
        .update(
            booth.id,
            UpdateBooth {
                industry: Some(Some("Aerospace".into())),
                hiring_for: Some(vec!["Avionics".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.industry.as_deref(), Some("Aerospace"));
    assert_eq!(updated.hiring_for, vec!["Avionics".to_string()]);
}
