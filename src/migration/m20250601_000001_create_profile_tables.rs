// ABOUTME: Initial migration creating profiles, payment_methods and social_connections
// ABOUTME: Unique indexes on username and (user_id, platform) are the source of truth for claims

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(ColumnDef::new(Profiles::Username).string().null().unique_key())
                    .col(ColumnDef::new(Profiles::DisplayName).string().null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string().null())
                    .col(ColumnDef::new(Profiles::SocialLinks).text().not_null().default("[]"))
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create payment_methods table
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentMethods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PaymentMethods::UserId).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Category).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Kind).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Label).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Identifier).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::BankName).string().null())
                    .col(ColumnDef::new(PaymentMethods::AccountNumber).string().null())
                    .col(ColumnDef::new(PaymentMethods::AccountName).string().null())
                    .col(ColumnDef::new(PaymentMethods::RoutingNumber).string().null())
                    .col(ColumnDef::new(PaymentMethods::CoinName).string().null())
                    .col(ColumnDef::new(PaymentMethods::Network).string().null())
                    .col(ColumnDef::new(PaymentMethods::WalletAddress).string().null())
                    .col(ColumnDef::new(PaymentMethods::DigitalWalletType).string().null())
                    .col(ColumnDef::new(PaymentMethods::DigitalWalletId).string().null())
                    .col(ColumnDef::new(PaymentMethods::SelectedColor).string().not_null().default("blue"))
                    .col(ColumnDef::new(PaymentMethods::IconType).string().null())
                    .col(ColumnDef::new(PaymentMethods::IconValue).string().null())
                    .col(ColumnDef::new(PaymentMethods::Tag).string().null())
                    .col(ColumnDef::new(PaymentMethods::DisplayOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(PaymentMethods::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(PaymentMethods::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_methods_user_id")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_methods_user_order")
                    .table(PaymentMethods::Table)
                    .col(PaymentMethods::UserId)
                    .col(PaymentMethods::DisplayOrder)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create social_connections table
        manager
            .create_table(
                Table::create()
                    .table(SocialConnections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SocialConnections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SocialConnections::UserId).string().not_null())
                    .col(ColumnDef::new(SocialConnections::Platform).string().not_null())
                    .col(ColumnDef::new(SocialConnections::PlatformUserId).string().not_null())
                    .col(ColumnDef::new(SocialConnections::PlatformUsername).string().not_null())
                    .col(ColumnDef::new(SocialConnections::PlatformDisplayName).string().null())
                    .col(ColumnDef::new(SocialConnections::PlatformAvatarUrl).string().null())
                    .col(ColumnDef::new(SocialConnections::VerifiedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_connections_user_id")
                            .from(SocialConnections::Table, SocialConnections::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_social_connections_user_platform")
                    .table(SocialConnections::Table)
                    .col(SocialConnections::UserId)
                    .col(SocialConnections::Platform)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialConnections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    Username,
    DisplayName,
    Bio,
    AvatarUrl,
    SocialLinks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Category,
    #[sea_orm(iden = "type")]
    Kind,
    Label,
    Identifier,
    BankName,
    AccountNumber,
    AccountName,
    RoutingNumber,
    CoinName,
    Network,
    WalletAddress,
    DigitalWalletType,
    DigitalWalletId,
    SelectedColor,
    IconType,
    IconValue,
    Tag,
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SocialConnections {
    Table,
    Id,
    UserId,
    Platform,
    PlatformUserId,
    PlatformUsername,
    PlatformDisplayName,
    PlatformAvatarUrl,
    VerifiedAt,
}
