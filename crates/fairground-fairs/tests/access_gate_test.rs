//! Integration tests for the access control gate: the admin check,
//! the company-membership check, and the admin-OR-company composite.

use fairground_core::error::FairgroundError;
use fairground_core::models::company::CreateCompany;
use fairground_core::models::user::{CreateUser, UserRole};
use fairground_core::repository::{CompanyRepository, UserRepository};
use fairground_db::repository::{SurrealCompanyRepository, SurrealUserRepository};
use fairground_fairs::AccessGate;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fairground_db::run_migrations(&db).await.unwrap();
    db
}

fn gate(db: &Surreal<Db>) -> AccessGate<SurrealUserRepository<Db>, SurrealCompanyRepository<Db>> {
    AccessGate::new(
        SurrealUserRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
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

async fn create_company(db: &Surreal<Db>, owner_id: Uuid) -> Uuid {
    SurrealCompanyRepository::new(db.clone())
        .create(CreateCompany {
            company_name: "ACME".into(),
            owner_id,
            invite_code: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn admin_check_accepts_administrators_only() {
    let db = setup().await;
    let gate = gate(&db);

    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    gate.verify_admin(admin).await.unwrap();

    let err = gate.verify_admin(student).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    let err = gate.verify_admin(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn company_check_accepts_owner_and_representatives() {
    let db = setup().await;
    let gate = gate(&db);

    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let rep = create_user(&db, UserRole::Representative, "rep@acme.example").await;
    let stranger = create_user(&db, UserRole::CompanyOwner, "other@example.com").await;
    let company = create_company(&db, owner).await;
    SurrealCompanyRepository::new(db.clone())
        .add_representative(company, rep)
        .await
        .unwrap();

    gate.verify_company_access(owner, company).await.unwrap();
    gate.verify_company_access(rep, company).await.unwrap();

    let err = gate.verify_company_access(stranger, company).await.unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));

    let err = gate
        .verify_company_access(owner, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::NotFound { .. }));
}

#[tokio::test]
async fn composite_allows_admin_without_membership() {
    let db = setup().await;
    let gate = gate(&db);

    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let company = create_company(&db, owner).await;

    // Admin is not an owner or representative of the company.
    gate.require_admin_or_company_access(admin, company)
        .await
        .unwrap();
}

#[tokio::test]
async fn composite_allows_member_without_admin_role() {
    let db = setup().await;
    let gate = gate(&db);

    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let company = create_company(&db, owner).await;

    // The failing admin check must not mask the valid company check.
    gate.require_admin_or_company_access(owner, company)
        .await
        .unwrap();
}

#[tokio::test]
async fn composite_denies_when_both_checks_fail() {
    let db = setup().await;
    let gate = gate(&db);

    let student = create_user(&db, UserRole::Student, "student@example.com").await;
    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let company = create_company(&db, owner).await;

    let err = gate
        .require_admin_or_company_access(student, company)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn composite_denies_unknown_caller() {
    let db = setup().await;
    let gate = gate(&db);

    let owner = create_user(&db, UserRole::CompanyOwner, "owner@acme.example").await;
    let company = create_company(&db, owner).await;

    let err = gate
        .require_admin_or_company_access(Uuid::new_v4(), company)
        .await
        .unwrap_err();
    assert!(matches!(err, FairgroundError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn is_admin_softens_failures_to_false() {
    let db = setup().await;
    let gate = gate(&db);

    let admin = create_user(&db, UserRole::Administrator, "admin@example.com").await;
    let student = create_user(&db, UserRole::Student, "student@example.com").await;

    assert!(gate.is_admin(Some(admin)).await.unwrap());
    assert!(!gate.is_admin(Some(student)).await.unwrap());
    assert!(!gate.is_admin(Some(Uuid::new_v4())).await.unwrap());
    assert!(!gate.is_admin(None).await.unwrap());
}
