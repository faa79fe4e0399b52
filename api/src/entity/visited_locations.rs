use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "visited_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub visit_datetime: DateTimeWithTimeZone,
    pub location_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
