use sea_orm_migration::prelude::*;

use crate::m20251019_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeviceProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeviceProfiles::UserId).uuid().not_null())
                    .col(ColumnDef::new(DeviceProfiles::TemplateId).uuid().null())
                    .col(
                        ColumnDef::new(DeviceProfiles::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::DeviceType)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(DeviceProfiles::DeviceType).is_in(["desktop", "mobile"])),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::Width)
                            .integer()
                            .null()
                            .check(Expr::col(DeviceProfiles::Width).gt(0)),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::Height)
                            .integer()
                            .null()
                            .check(Expr::col(DeviceProfiles::Height).gt(0)),
                    )
                    .col(ColumnDef::new(DeviceProfiles::UserAgent).text().null())
                    .col(
                        ColumnDef::new(DeviceProfiles::CountryCode)
                            .string_len(2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::CustomHeaders)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_profiles_user_id")
                            .from(DeviceProfiles::Table, DeviceProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一用户下 profile 名称唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_device_profiles_user_name")
                    .table(DeviceProfiles::Table)
                    .col(DeviceProfiles::UserId)
                    .col(DeviceProfiles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 分页列表：user_id + created_at DESC
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_device_profiles_user_created")
                    .table(DeviceProfiles::Table)
                    .col(DeviceProfiles::UserId)
                    .col(DeviceProfiles::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_device_profiles_user_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("uq_device_profiles_user_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DeviceProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeviceProfiles {
    #[sea_orm(iden = "device_profiles")]
    Table,
    Id,
    UserId,
    TemplateId,
    Name,
    DeviceType,
    Width,
    Height,
    UserAgent,
    CountryCode,
    CustomHeaders,
    CreatedAt,
    UpdatedAt,
}
