use crate::db::now_timestamp;
use crate::db::repositories::review::{ReviewRepository, average_rating_expr};
use crate::domain::{CreditRole, MovieId, ReferenceKind};
use crate::entities::{
    countries, genres, languages, movie_credits, movie_genres, movie_languages, movies, people,
    prelude::*, reviews, roles,
};
use crate::models::movie::{CastRole, MovieDetail, MovieDraft, MovieSummary, NamedRef};
use crate::services::MovieError;
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use std::collections::HashSet;
use tracing::{info, warn};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a movie and every association row in one transaction.
    ///
    /// Either the whole aggregate commits or nothing does: an unresolved reference
    /// or a storage error rolls the transaction back before returning.
    ///
    /// The movie row is written before any reference lookup. SQLite cannot upgrade
    /// a deferred transaction from read to write while another writer is active, so
    /// a read-first transaction fails with `SQLITE_BUSY` instead of waiting.
    pub async fn create(&self, draft: &MovieDraft) -> Result<movies::Model, MovieError> {
        let txn = self.conn.begin().await?;

        match Self::write_aggregate(&txn, draft).await {
            Ok(movie) => {
                txn.commit().await?;
                info!("Created movie {} ({}) with id {}", movie.title, movie.year, movie.id);
                Ok(movie)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after failed movie creation also failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    async fn write_aggregate(
        txn: &DatabaseTransaction,
        draft: &MovieDraft,
    ) -> Result<movies::Model, MovieError> {
        let genre_ids = dedup(&draft.genre_ids);
        let language_ids = dedup(&draft.language_ids);
        let credits: Vec<(CreditRole, Vec<i32>)> = vec![
            (CreditRole::Director, dedup(&draft.director_ids)),
            (CreditRole::Writer, dedup(&draft.writer_ids)),
            (CreditRole::Actor, dedup(&draft.actor_ids)),
        ];

        let person_ids: Vec<i32> = dedup(
            &credits
                .iter()
                .flat_map(|(_, ids)| ids.iter().copied())
                .chain(draft.roles.iter().map(|r| r.person_id))
                .collect::<Vec<_>>(),
        );
        let country_ids: Vec<i32> = draft.country_id.into_iter().collect();

        let now = now_timestamp();
        let mut movie = movies::ActiveModel {
            title: Set(draft.title.trim().to_string()),
            year: Set(draft.year),
            runtime: Set(draft.runtime),
            plot: Set(draft.plot.clone()),
            tagline: Set(draft.tagline.clone()),
            budget: Set(draft.budget),
            gross: Set(draft.gross),
            rating: Set(draft.rating),
            votes: Set(draft.votes),
            metascore: Set(draft.metascore),
            country_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        // The insert above holds the write lock; resolution reads run under it.
        for (kind, ids) in [
            (ReferenceKind::Genre, &genre_ids),
            (ReferenceKind::Person, &person_ids),
            (ReferenceKind::Language, &language_ids),
            (ReferenceKind::Country, &country_ids),
        ] {
            if let Some(id) = first_unresolved(txn, kind, ids).await? {
                return Err(MovieError::UnresolvedReference { kind, id });
            }
        }

        if draft.country_id.is_some() {
            let mut active: movies::ActiveModel = movie.into();
            active.country_id = Set(draft.country_id);
            movie = active.update(txn).await?;
        }

        if !genre_ids.is_empty() {
            let rows = genre_ids.iter().map(|&genre_id| movie_genres::ActiveModel {
                movie_id: Set(movie.id),
                genre_id: Set(genre_id),
            });
            MovieGenres::insert_many(rows).exec(txn).await?;
        }

        if !language_ids.is_empty() {
            let rows = language_ids
                .iter()
                .map(|&language_id| movie_languages::ActiveModel {
                    movie_id: Set(movie.id),
                    language_id: Set(language_id),
                });
            MovieLanguages::insert_many(rows).exec(txn).await?;
        }

        let credit_rows: Vec<movie_credits::ActiveModel> = credits
            .iter()
            .flat_map(|(role, ids)| {
                ids.iter().map(move |&person_id| movie_credits::ActiveModel {
                    movie_id: Set(movie.id),
                    person_id: Set(person_id),
                    role: Set(role.as_str().to_string()),
                })
            })
            .collect();
        if !credit_rows.is_empty() {
            MovieCredits::insert_many(credit_rows).exec(txn).await?;
        }

        if !draft.roles.is_empty() {
            let rows = draft.roles.iter().map(|r| roles::ActiveModel {
                movie_id: Set(movie.id),
                person_id: Set(r.person_id),
                character: Set(r.character.trim().to_string()),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                deleted_at: Set(None),
                ..Default::default()
            });
            Roles::insert_many(rows).exec(txn).await?;
        }

        Ok(movie)
    }

    /// All live movies with their mean rating, computed in one grouped query.
    pub async fn list_with_ratings(&self) -> Result<Vec<MovieSummary>> {
        let rows = Movies::find()
            .select_only()
            .column(movies::Column::Id)
            .column(movies::Column::Title)
            .column(movies::Column::Year)
            .column(movies::Column::Plot)
            .column_as(average_rating_expr(), "average_rating")
            .join(
                JoinType::LeftJoin,
                movies::Relation::Reviews.def().on_condition(|_left, _right| {
                    sea_orm::Condition::all().add(
                        sea_orm::sea_query::Expr::col((
                            reviews::Entity,
                            reviews::Column::DeletedAt,
                        ))
                        .is_null(),
                    )
                }),
            )
            .filter(movies::Column::DeletedAt.is_null())
            .group_by(movies::Column::Id)
            .order_by_asc(movies::Column::Id)
            .into_model::<MovieSummary>()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get_detail(&self, id: MovieId) -> Result<Option<MovieDetail>> {
        let Some((movie, country)) = Movies::find_by_id(id.value())
            .filter(movies::Column::DeletedAt.is_null())
            .find_also_related(Countries)
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let genres = MovieGenres::find()
            .filter(movie_genres::Column::MovieId.eq(movie.id))
            .find_also_related(Genres)
            .all(&self.conn)
            .await?
            .into_iter()
            .filter_map(|(_, genre)| genre.filter(|g| g.deleted_at.is_none()))
            .map(|g: genres::Model| NamedRef {
                id: g.id,
                name: g.name,
            })
            .collect();

        let languages = MovieLanguages::find()
            .filter(movie_languages::Column::MovieId.eq(movie.id))
            .find_also_related(Languages)
            .all(&self.conn)
            .await?
            .into_iter()
            .filter_map(|(_, language)| language.filter(|l| l.deleted_at.is_none()))
            .map(|l: languages::Model| NamedRef {
                id: l.id,
                name: l.name,
            })
            .collect();

        let mut directors = Vec::new();
        let mut writers = Vec::new();
        let mut actors = Vec::new();
        let credits = MovieCredits::find()
            .filter(movie_credits::Column::MovieId.eq(movie.id))
            .find_also_related(People)
            .all(&self.conn)
            .await?;
        for (credit, person) in credits {
            let Some(person) = person.filter(|p| p.deleted_at.is_none()) else {
                continue;
            };
            let entry = NamedRef {
                id: person.id,
                name: person.name,
            };
            match CreditRole::parse(&credit.role) {
                Some(CreditRole::Director) => directors.push(entry),
                Some(CreditRole::Writer) => writers.push(entry),
                Some(CreditRole::Actor) => actors.push(entry),
                None => warn!("Ignoring credit with unknown role '{}'", credit.role),
            }
        }

        let roles = Roles::find()
            .filter(roles::Column::MovieId.eq(movie.id))
            .filter(roles::Column::DeletedAt.is_null())
            .order_by_asc(roles::Column::Id)
            .find_also_related(People)
            .all(&self.conn)
            .await?
            .into_iter()
            .filter_map(|(role, person)| {
                person.map(|p: people::Model| CastRole {
                    person_id: p.id,
                    person_name: p.name,
                    character: role.character,
                })
            })
            .collect();

        let average_rating = ReviewRepository::new(self.conn.clone())
            .mean_rating(id)
            .await?;

        Ok(Some(MovieDetail {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            runtime: movie.runtime,
            plot: movie.plot,
            tagline: movie.tagline,
            budget: movie.budget,
            gross: movie.gross,
            rating: movie.rating,
            votes: movie.votes,
            metascore: movie.metascore,
            country: country
                .filter(|c| c.deleted_at.is_none())
                .map(|c: countries::Model| NamedRef {
                    id: c.id,
                    name: c.name,
                }),
            genres,
            languages,
            directors,
            writers,
            actors,
            roles,
            average_rating,
            created_at: movie.created_at,
        }))
    }

    /// Physical row count, soft-deleted rows included.
    pub async fn count(&self) -> Result<u64> {
        Ok(Movies::find().count(&self.conn).await?)
    }
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Returns the first id in `ids` that has no live row in the table for `kind`.
async fn first_unresolved<C>(
    conn: &C,
    kind: ReferenceKind,
    ids: &[i32],
) -> Result<Option<i32>, DbErr>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(None);
    }

    let found: Vec<i32> = match kind {
        ReferenceKind::Genre => {
            live_ids::<Genres, _>(conn, genres::Column::Id, genres::Column::DeletedAt, ids).await?
        }
        ReferenceKind::Person => {
            live_ids::<People, _>(conn, people::Column::Id, people::Column::DeletedAt, ids).await?
        }
        ReferenceKind::Country => {
            live_ids::<Countries, _>(conn, countries::Column::Id, countries::Column::DeletedAt, ids)
                .await?
        }
        ReferenceKind::Language => {
            live_ids::<Languages, _>(conn, languages::Column::Id, languages::Column::DeletedAt, ids)
                .await?
        }
    };

    let found: HashSet<i32> = found.into_iter().collect();
    Ok(ids.iter().copied().find(|id| !found.contains(id)))
}

async fn live_ids<E, C>(
    conn: &C,
    id_column: E::Column,
    deleted_column: E::Column,
    ids: &[i32],
) -> Result<Vec<i32>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find()
        .select_only()
        .column(id_column)
        .filter(id_column.is_in(ids.iter().copied()))
        .filter(deleted_column.is_null())
        .into_tuple()
        .all(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedup(&[]).is_empty());
    }
}
