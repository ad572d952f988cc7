use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub runtime: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub plot: Option<String>,
    pub tagline: Option<String>,
    pub budget: Option<i64>,
    pub gross: Option<i64>,
    /// Outside critic data, kept apart from the review average.
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub metascore: Option<i32>,
    pub country_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Countries,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_languages::Entity")]
    MovieLanguages,
    #[sea_orm(has_many = "super::movie_credits::Entity")]
    MovieCredits,
    #[sea_orm(has_many = "super::roles::Entity")]
    Roles,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_languages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieLanguages.def()
    }
}

impl Related<super::movie_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCredits.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
