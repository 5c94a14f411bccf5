use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
    pub company_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::contract::model::Employee {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            position: m.position,
            company_id: m.company_id,
        }
    }
}

impl From<crate::contract::model::Employee> for ActiveModel {
    fn from(e: crate::contract::model::Employee) -> Self {
        use sea_orm::Set;
        Self {
            id: Set(e.id),
            name: Set(e.name),
            age: Set(e.age),
            position: Set(e.position),
            company_id: Set(e.company_id),
        }
    }
}
