use log::info;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::Location).string())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Media::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Media::Title).string().not_null())
                    .col(ColumnDef::new(Media::Year).string())
                    .col(
                        ColumnDef::new(Media::Category)
                            .string_len(10)
                            .not_null()
                            .check(Expr::col(Media::Category).is_in(["movie", "series"])),
                    )
                    .col(ColumnDef::new(Media::Genre).string())
                    .col(ColumnDef::new(Media::Director).string())
                    .col(ColumnDef::new(Media::Writer).string())
                    .col(ColumnDef::new(Media::Actors).string())
                    .col(ColumnDef::new(Media::Plot).text())
                    .col(ColumnDef::new(Media::Country).string())
                    .col(ColumnDef::new(Media::Ratings).json_binary())
                    .col(ColumnDef::new(Media::Metascore).string())
                    .col(ColumnDef::new(Media::BoxOffice).string())
                    .col(
                        ColumnDef::new(Media::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 标题查找按 lower(title) 比较
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_media_lower_title ON media (lower(title))",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Interaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interaction::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interaction::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Interaction::MediaId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Interaction::Watched)
                            .string_len(3)
                            .not_null()
                            .default("no")
                            .check(Expr::col(Interaction::Watched).is_in(["yes", "no"])),
                    )
                    .col(
                        ColumnDef::new(Interaction::Rating)
                            .integer()
                            .check(Expr::col(Interaction::Rating).between(0, 10)),
                    )
                    .col(
                        ColumnDef::new(Interaction::Watchlist)
                            .string_len(3)
                            .not_null()
                            .default("no")
                            .check(Expr::col(Interaction::Watchlist).is_in(["yes", "no"])),
                    )
                    .col(
                        ColumnDef::new(Interaction::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Interaction::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interaction_user")
                            .from(Interaction::Table, Interaction::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interaction_media")
                            .from(Interaction::Table, Interaction::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个用户对同一媒体只有一条交互记录
        manager
            .create_index(
                Index::create()
                    .name("interaction_user_media_unique")
                    .table(Interaction::Table)
                    .col(Interaction::UserId)
                    .col(Interaction::MediaId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interaction_media_id")
                    .table(Interaction::Table)
                    .col(Interaction::MediaId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comments::Created)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Comments::ParentId).big_integer())
                    .col(ColumnDef::new(Comments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::MediaId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_parent")
                            .from(Comments::Table, Comments::ParentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_media")
                            .from(Comments::Table, Comments::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_media_id")
                    .table(Comments::Table)
                    .col(Comments::MediaId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        info!("created users, media, interaction and comments tables");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Interaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Password,
    Location,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
    Title,
    Year,
    Category,
    Genre,
    Director,
    Writer,
    Actors,
    Plot,
    Country,
    Ratings,
    Metascore,
    BoxOffice,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Interaction {
    Table,
    Id,
    UserId,
    MediaId,
    Watched,
    Rating,
    Watchlist,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Content,
    Created,
    ParentId,
    UserId,
    MediaId,
}
