use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ordered type references, `int8[]`
    pub animal_types: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: String,
    pub life_status: String,
    pub chipping_datetime: DateTimeWithTimeZone,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
    /// Ordered visited-location entry ids, `int8[]`
    pub visited_locations: Vec<i64>,
    pub death_datetime: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
