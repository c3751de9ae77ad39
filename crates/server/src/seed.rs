//! Baseline data for the lawyer directory: four specializations and one
//! verified lawyer in each.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, Utc};
use shared_types::{AppError, UserRole, VerificationStatus};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::password::unusable_password;
use crate::error_convert::SqlxErrorExt;
use crate::repo::{self, lawyer::LawyerProfileFields, specialization::SpecializationFields, user::NewUser};

#[derive(Debug, Clone, Copy)]
pub struct SpecializationSeed {
    pub slug: &'static str,
    pub name_en: &'static str,
    pub name_bn: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct LawyerSeed {
    pub email: &'static str,
    pub phone: &'static str,
    pub name: &'static str,
    pub bio: &'static str,
    pub location: &'static str,
    /// Whole taka, charged for both online and offline consultations.
    pub fee: i64,
    pub experience_years: u64,
    pub specializations: &'static [&'static str],
}

pub const SPECIALIZATIONS: [SpecializationSeed; 4] = [
    SpecializationSeed {
        slug: "family-law",
        name_en: "Family Law",
        name_bn: "পারিবারিক আইন",
    },
    SpecializationSeed {
        slug: "criminal-defense",
        name_en: "Criminal Defense",
        name_bn: "ফৌজদারি আইন",
    },
    SpecializationSeed {
        slug: "property-law",
        name_en: "Property & Land",
        name_bn: "সম্পত্তি আইন",
    },
    SpecializationSeed {
        slug: "corporate-law",
        name_en: "Corporate & Tax",
        name_bn: "কর্পোরেট আইন",
    },
];

pub const LAWYERS: [LawyerSeed; 4] = [
    LawyerSeed {
        email: "farhana.siddiqui@example.com",
        phone: "01710000001",
        name: "Farhana Siddiqui",
        bio: "12+ years advocating for women and children in family disputes.",
        location: "Dhaka, Bangladesh",
        fee: 2500,
        experience_years: 12,
        specializations: &["family-law"],
    },
    LawyerSeed {
        email: "anik.chowdhury@example.com",
        phone: "01710000002",
        name: "Anik Chowdhury",
        bio: "Former public prosecutor focusing on criminal litigation and appeals.",
        location: "Chittagong, Bangladesh",
        fee: 3000,
        experience_years: 15,
        specializations: &["criminal-defense"],
    },
    LawyerSeed {
        email: "labib.rahman@example.com",
        phone: "01710000003",
        name: "Labib Rahman",
        bio: "Property and land rights specialist helping resolve title disputes.",
        location: "Sylhet, Bangladesh",
        fee: 2200,
        experience_years: 10,
        specializations: &["property-law"],
    },
    LawyerSeed {
        email: "nabila.hoque@example.com",
        phone: "01710000004",
        name: "Nabila Hoque",
        bio: "Handles corporate compliance, startup advisory, and tax restructuring.",
        location: "Khulna, Bangladesh",
        fee: 3500,
        experience_years: 9,
        specializations: &["corporate-law"],
    },
];

/// What a seed run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub specializations: usize,
    pub lawyers: usize,
    pub specialization_links: usize,
    pub skipped_slugs: Vec<String>,
}

/// `BCS-` followed by the first eight hex digits of the user id, uppercased.
pub fn bar_council_number(user_id: Uuid) -> String {
    let hex = user_id.simple().to_string();
    format!("BCS-{}", hex[..8].to_ascii_uppercase())
}

/// Licence date implied by `experience_years`, counted as 365-day years.
pub fn license_issue_date(today: NaiveDate, experience_years: u64) -> Result<NaiveDate, AppError> {
    today
        .checked_sub_days(Days::new(365 * experience_years))
        .ok_or_else(|| AppError::internal("License issue date out of range"))
}

/// Upsert the baseline specializations and lawyers. Safe to run repeatedly:
/// rows are keyed by slug, email and user, and each lawyer's specialization
/// links are replaced rather than appended. Runs in one transaction.
#[tracing::instrument(skip(pool))]
pub async fn seed_lawyers(pool: &Pool<Postgres>) -> Result<SeedReport, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let mut report = SeedReport::default();
    let today = Utc::now().date_naive();

    tracing::info!("Seeding legal specializations");
    let mut spec_lookup: HashMap<&str, i32> = HashMap::new();
    for seed in &SPECIALIZATIONS {
        let description_en = format!("{} related matters.", seed.name_en);
        let spec = repo::specialization::upsert(
            &mut *tx,
            &SpecializationFields {
                slug: seed.slug,
                name_en: seed.name_en,
                name_bn: seed.name_bn,
                description_en: &description_en,
                description_bn: seed.name_bn,
                is_active: true,
            },
        )
        .await?;
        spec_lookup.insert(seed.slug, spec.id);
        report.specializations += 1;
    }

    tracing::info!("Seeding lawyer profiles");
    for seed in &LAWYERS {
        let user = repo::user::upsert_by_email(
            &mut *tx,
            &NewUser {
                email: seed.email.to_string(),
                phone_number: seed.phone.to_string(),
                name: seed.name.to_string(),
                password_hash: unusable_password(),
                role: UserRole::Lawyer,
                is_active: true,
                is_verified: true,
                is_staff: false,
                is_superuser: false,
            },
        )
        .await?;
        repo::group::add_user_to_role_group(&mut *tx, user.user_id, UserRole::Lawyer).await?;
        let dropped =
            repo::group::remove_user_from_other_role_groups(&mut *tx, user.user_id, UserRole::Lawyer)
                .await?;
        if dropped > 0 {
            tracing::info!(email = seed.email, dropped, "Removed stale role groups");
        }

        let bar_number = bar_council_number(user.user_id);
        let profile = repo::lawyer::upsert_profile(
            &mut *tx,
            &LawyerProfileFields {
                user_id: user.user_id,
                full_name_en: seed.name,
                full_name_bn: seed.name,
                license_issue_date: license_issue_date(today, seed.experience_years)?,
                bar_council_number: &bar_number,
                bio_en: seed.bio,
                bio_bn: seed.bio,
                chamber_address: seed.location,
                consultation_fee_online: seed.fee,
                consultation_fee_offline: seed.fee,
                verification_status: VerificationStatus::Verified,
            },
        )
        .await?;

        repo::specialization::clear_for_lawyer(&mut *tx, profile.id).await?;
        for slug in seed.specializations {
            let Some(&spec_id) = spec_lookup.get(slug) else {
                tracing::warn!(%slug, email = seed.email, "Unknown specialization, skipping");
                report.skipped_slugs.push(slug.to_string());
                continue;
            };
            repo::specialization::map_to_lawyer(&mut *tx, profile.id, spec_id).await?;
            report.specialization_links += 1;
        }

        tracing::debug!(email = seed.email, lawyer_id = %profile.id, "Seeded lawyer");
        report.lawyers += 1;
    }

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    tracing::info!(
        specializations = report.specializations,
        lawyers = report.lawyers,
        "Lawyer directory seed completed"
    );
    Ok(report)
}
