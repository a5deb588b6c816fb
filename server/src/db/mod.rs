use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;
use shared::{Manifest, Stats};
use sqlx::{types::Json, PgPool};
use tracing::instrument;

use crate::sink::{ProfileSink, ProfileStore};

#[derive(Database, Clone, Debug)]
#[database("year-in-code")]
pub struct DB(PgPool);

pub mod types;

use self::types::{Profile, ProfileRecord, ProfileRow};

impl DB {
    pub async fn get_profile(&self, login: &str) -> anyhow::Result<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT login, email, avatar_url, company, pull_requests_opened,
                   github_stats, video_manifest, is_member
            FROM profiles
            WHERE lower(login) = lower($1)
            "#,
        )
        .bind(login)
        .fetch_optional(&self.0)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn get_manifest(&self, login: &str) -> anyhow::Result<Option<Manifest>> {
        let row: Option<(Option<Json<Manifest>>,)> =
            sqlx::query_as("SELECT video_manifest FROM profiles WHERE lower(login) = lower($1)")
                .bind(login)
                .fetch_optional(&self.0)
                .await?;

        Ok(row.and_then(|(manifest,)| manifest).map(|manifest| manifest.0))
    }
}

#[async_trait::async_trait]
impl ProfileSink for DB {
    #[instrument(skip(self, record), fields(login = %record.login))]
    async fn store_stats(&self, record: &ProfileRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (login, email, avatar_url, company, pull_requests_opened, github_stats, is_member)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (login) DO UPDATE
            SET email = EXCLUDED.email,
                avatar_url = EXCLUDED.avatar_url,
                company = EXCLUDED.company,
                pull_requests_opened = EXCLUDED.pull_requests_opened,
                github_stats = EXCLUDED.github_stats,
                is_member = EXCLUDED.is_member
            "#,
        )
        .bind(&record.login)
        .bind(&record.email)
        .bind(&record.avatar_url)
        .bind(&record.company)
        .bind(record.pull_requests_opened)
        .bind(Json(&record.github_stats))
        .bind(record.is_member)
        .execute(&self.0)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, manifest))]
    async fn store_manifest(&self, login: &str, manifest: &Manifest) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET video_manifest = $2
            WHERE lower(login) = lower($1)
            "#,
        )
        .bind(login)
        .bind(Json(manifest))
        .execute(&self.0)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Profile {login} not found");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for DB {
    async fn load_stats(&self, login: &str) -> anyhow::Result<Option<Stats>> {
        Ok(self
            .get_profile(login)
            .await?
            .map(|profile| profile.record.github_stats))
    }

    async fn load_manifest(&self, login: &str) -> anyhow::Result<Option<Manifest>> {
        self.get_manifest(login).await
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::migrate!("./migrations").run(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                rocket::error!("Failed to initialize SQLx database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("SQLx Stage", |rocket| async {
        rocket
            .attach(DB::init())
            .attach(AdHoc::try_on_ignite("SQLx Migrations", run_migrations))
    })
}
