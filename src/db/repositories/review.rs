use crate::db::now_timestamp;
use crate::domain::{MovieId, ReviewId, UserId};
use crate::entities::{movies, prelude::*, reviews, users};
use crate::models::review::{ReviewDraft, ReviewRow};
use crate::services::ReviewError;
use anyhow::Result;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, warn};

/// `COALESCE(AVG(reviews.rating), 0.0)`: a movie without rated reviews averages 0.
///
/// Rows with a NULL rating are skipped by `AVG`, so text-only reviews do not pull
/// the mean toward zero.
pub(crate) fn average_rating_expr() -> SimpleExpr {
    Func::coalesce([
        Func::avg(Expr::col((reviews::Entity, reviews::Column::Rating))).into(),
        Expr::val(0.0_f64).into(),
    ])
    .into()
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a review for `user_id`.
    ///
    /// The movie must exist and be live. A second review by the same user for the
    /// same movie is rejected by the unique index on `(movie_id, user_id)`.
    ///
    /// The insert is the first statement of the transaction so the write lock is
    /// taken up front; the movie check runs afterwards under that lock.
    pub async fn create(
        &self,
        user_id: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewId, ReviewError> {
        let txn = self.conn.begin().await?;

        let now = now_timestamp();
        let inserted = reviews::ActiveModel {
            movie_id: Set(draft.movie_id.value()),
            user_id: Set(user_id.value()),
            rating: Set(draft.rating),
            text: Set(draft.text.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let review = match inserted {
            Ok(review) => review,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after failed review insert also failed: {rollback_err}");
                }
                return Err(match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ReviewError::Duplicate(draft.movie_id)
                    }
                    Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                        ReviewError::MovieNotFound(draft.movie_id)
                    }
                    _ => ReviewError::from(e),
                });
            }
        };

        let movie_is_live = Movies::find_by_id(draft.movie_id.value())
            .filter(movies::Column::DeletedAt.is_null())
            .count(&txn)
            .await?
            > 0;
        if !movie_is_live {
            txn.rollback().await?;
            return Err(ReviewError::MovieNotFound(draft.movie_id));
        }

        txn.commit().await?;
        debug!(
            "User {} reviewed movie {} (review {})",
            user_id, draft.movie_id, review.id
        );
        Ok(ReviewId::new(review.id))
    }

    /// Mean rating of the live reviews of one movie, 0.0 when there are none.
    pub async fn mean_rating(&self, movie_id: MovieId) -> Result<f64> {
        let mean: Option<f64> = Reviews::find()
            .select_only()
            .column_as(average_rating_expr(), "average_rating")
            .filter(reviews::Column::MovieId.eq(movie_id.value()))
            .filter(reviews::Column::DeletedAt.is_null())
            .into_tuple()
            .one(&self.conn)
            .await?;

        Ok(mean.unwrap_or(0.0))
    }

    fn joined_rows() -> Select<Reviews> {
        Reviews::find()
            .select_only()
            .column(reviews::Column::Id)
            .column(reviews::Column::MovieId)
            .column(reviews::Column::UserId)
            .column_as(users::Column::Username, "user_name")
            .column_as(movies::Column::Title, "movie_title")
            .column(reviews::Column::Rating)
            .column(reviews::Column::Text)
            .column(reviews::Column::CreatedAt)
            .join(JoinType::InnerJoin, reviews::Relation::Users.def())
            .join(JoinType::InnerJoin, reviews::Relation::Movies.def())
            .filter(reviews::Column::DeletedAt.is_null())
    }

    pub async fn list(&self) -> Result<Vec<ReviewRow>> {
        let rows = Self::joined_rows()
            .order_by_asc(reviews::Column::Id)
            .into_model::<ReviewRow>()
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: ReviewId) -> Result<Option<ReviewRow>> {
        let row = Self::joined_rows()
            .filter(reviews::Column::Id.eq(id.value()))
            .into_model::<ReviewRow>()
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Physical row count, soft-deleted rows included.
    pub async fn count(&self) -> Result<u64> {
        Ok(Reviews::find().count(&self.conn).await?)
    }
}
