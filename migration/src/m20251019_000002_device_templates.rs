use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeviceTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceTemplates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::DeviceType)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(DeviceTemplates::DeviceType).is_in(["desktop", "mobile"])),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::Width)
                            .integer()
                            .null()
                            .check(Expr::col(DeviceTemplates::Width).gt(0)),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::Height)
                            .integer()
                            .null()
                            .check(Expr::col(DeviceTemplates::Height).gt(0)),
                    )
                    .col(ColumnDef::new(DeviceTemplates::UserAgent).text().not_null())
                    .col(
                        ColumnDef::new(DeviceTemplates::CountryCode)
                            .string_len(2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::DefaultHeaders)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 模板列表按名称排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_device_templates_name")
                    .table(DeviceTemplates::Table)
                    .col(DeviceTemplates::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_device_templates_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DeviceTemplates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeviceTemplates {
    #[sea_orm(iden = "device_templates")]
    Table,
    Id,
    Name,
    DeviceType,
    Width,
    Height,
    UserAgent,
    CountryCode,
    DefaultHeaders,
    CreatedAt,
}
