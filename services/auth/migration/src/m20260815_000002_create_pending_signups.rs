use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingSignups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingSignups::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PendingSignups::Name).string().not_null())
                    .col(
                        ColumnDef::new(PendingSignups::PasswordHash)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingSignups::Role).string().not_null())
                    .col(
                        ColumnDef::new(PendingSignups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingSignups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingSignups::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PendingSignups {
    Table,
    Email,
    Name,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}
