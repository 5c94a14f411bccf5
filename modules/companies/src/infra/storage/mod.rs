pub mod entity;
pub mod migrations;
pub mod order;
pub mod sea_orm_repo;
pub mod seed;
