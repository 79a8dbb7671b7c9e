use sea_orm_migration::{prelude::*, schema::*};

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
                    .col(pk_auto(Users::Id))
                    .col(string_len_uniq(Users::Name, 100))
                    .col(string_len_uniq(Users::NameKey, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 100))
                    .col(string_len(Movies::TitleKey, 100))
                    .col(string_len_null(Movies::Director, 100))
                    .col(integer_null(Movies::Year))
                    .col(string_len_null(Movies::PosterUrl, 200))
                    .col(integer(Movies::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_user_id")
                            .from(Movies::Table, Movies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs both the per-user listing and the duplicate-title check.
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_user_id_title_key")
                    .table(Movies::Table)
                    .col(Movies::UserId)
                    .col(Movies::TitleKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    NameKey,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    TitleKey,
    Director,
    Year,
    PosterUrl,
    UserId,
}
