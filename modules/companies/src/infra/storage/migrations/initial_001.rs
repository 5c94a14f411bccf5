use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Address,
    Country,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Age,
    Position,
    CompanyId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Companies::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Companies::Address).string_len(60).not_null())
                    .col(ColumnDef::new(Companies::Country).string_len(30).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Employees::Age).integer().not_null())
                    .col(ColumnDef::new(Employees::Position).string_len(20).not_null())
                    .col(ColumnDef::new(Employees::CompanyId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_company_id")
                            .from(Employees::Table, Employees::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_company_id")
                    .table(Employees::Table)
                    .col(Employees::CompanyId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}
