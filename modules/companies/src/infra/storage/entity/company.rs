use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee::Entity")]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::contract::model::Company {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            country: m.country,
        }
    }
}

impl From<crate::contract::model::Company> for ActiveModel {
    fn from(c: crate::contract::model::Company) -> Self {
        use sea_orm::Set;
        Self {
            id: Set(c.id),
            name: Set(c.name),
            address: Set(c.address),
            country: Set(c.country),
        }
    }
}
