use crate::db::now_timestamp;
use crate::entities::{countries, genres, languages, people, prelude::*};
use crate::models::seed::SeedData;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QuerySelect, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Rows inserted by one seed run. Names that already existed are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub genres: u64,
    pub countries: u64,
    pub languages: u64,
    pub people: u64,
}

impl SeedReport {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.genres + self.countries + self.languages + self.people
    }
}

pub struct ReferenceRepository {
    conn: DatabaseConnection,
}

impl ReferenceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts every name from `seed` that is not already present.
    ///
    /// Running the same file twice is a no-op the second time.
    pub async fn apply_seed(&self, seed: &SeedData) -> Result<SeedReport> {
        let txn = self.conn.begin().await?;

        let report = SeedReport {
            genres: insert_missing_names::<Genres, _, _>(
                &txn,
                &seed.genres,
                genres::Column::Name,
                |name, now| genres::ActiveModel {
                    name: Set(name),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                    ..Default::default()
                },
            )
            .await
            .context("Failed to seed genres")?,
            countries: insert_missing_names::<Countries, _, _>(
                &txn,
                &seed.countries,
                countries::Column::Name,
                |name, now| countries::ActiveModel {
                    name: Set(name),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                    ..Default::default()
                },
            )
            .await
            .context("Failed to seed countries")?,
            languages: insert_missing_names::<Languages, _, _>(
                &txn,
                &seed.languages,
                languages::Column::Name,
                |name, now| languages::ActiveModel {
                    name: Set(name),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                    ..Default::default()
                },
            )
            .await
            .context("Failed to seed languages")?,
            people: insert_missing_names::<People, _, _>(
                &txn,
                &seed.people,
                people::Column::Name,
                |name, now| people::ActiveModel {
                    name: Set(name),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                    ..Default::default()
                },
            )
            .await
            .context("Failed to seed people")?,
        };

        txn.commit().await?;

        info!(
            "Seed applied: {} genres, {} countries, {} languages, {} people",
            report.genres, report.countries, report.languages, report.people
        );
        Ok(report)
    }
}

async fn insert_missing_names<E, A, C>(
    conn: &C,
    names: &[String],
    name_column: E::Column,
    build: impl Fn(String, String) -> A,
) -> Result<u64>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
    C: ConnectionTrait,
{
    let mut seen: HashSet<String> = E::find()
        .select_only()
        .column(name_column)
        .into_tuple::<String>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    let now = now_timestamp();
    let fresh: Vec<A> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert((*n).to_string()))
        .map(|n| build(n.to_string(), now.clone()))
        .collect();

    if fresh.is_empty() {
        return Ok(0);
    }

    let inserted = fresh.len() as u64;
    E::insert_many(fresh).exec(conn).await?;
    Ok(inserted)
}
