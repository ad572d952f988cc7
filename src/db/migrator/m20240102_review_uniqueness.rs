use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // At most one review per user per movie. Duplicate inserts surface as a
        // unique-constraint violation that the review repository maps to a conflict.
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_movie_user_unique")
                    .table(Reviews::Table)
                    .col(Reviews::MovieId)
                    .col(Reviews::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_credits_person")
                    .table(MovieCredits::Table)
                    .col(MovieCredits::PersonId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_movie_credits_person")
                    .table(MovieCredits::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reviews_movie_user_unique")
                    .table(Reviews::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    MovieId,
    UserId,
}

#[derive(DeriveIden)]
enum MovieCredits {
    Table,
    PersonId,
}
