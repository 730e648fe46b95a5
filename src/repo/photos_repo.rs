use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::model::photo::{Photo, Position};

/// Flat row shape of the `photos` table; the wire model nests the position.
#[derive(FromRow)]
struct PhotoRow {
    id: String,
    image_url: String,
    message: String,
    position_x: f64,
    position_y: f64,
    rotation: f64,
    created_at: OffsetDateTime,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            image_url: row.image_url,
            message: row.message,
            position: Position {
                x: row.position_x,
                y: row.position_y,
            },
            rotation: row.rotation,
            created_at: row.created_at,
        }
    }
}

pub trait PhotosRepo<'c>: SqliteExecutor<'c> {
    async fn get_recent_photos(self, limit: i64) -> sqlx::Result<Vec<Photo>> {
        let rows: Vec<PhotoRow> = sqlx::query_as(
            "select id, image_url, message, position_x, position_y, rotation, created_at
             from photos order by created_at desc limit $1",
        )
        .bind(limit)
        .fetch_all(self)
        .await?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    /// Fails on a duplicate id, there are no updates in the API surface
    async fn insert_photo(self, photo: &Photo) -> sqlx::Result<()> {
        sqlx::query(
            "insert into photos (id, image_url, message, position_x, position_y, rotation, created_at)
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&photo.id)
        .bind(&photo.image_url)
        .bind(&photo.message)
        .bind(photo.position.x)
        .bind(photo.position.y)
        .bind(photo.rotation)
        .bind(photo.created_at)
        .execute(self)
        .await?;

        Ok(())
    }

    /// Not reachable from the API surface; used to roll an insert back when
    /// the blob write behind it fails.
    async fn delete_photo(self, id: &str) -> sqlx::Result<()> {
        sqlx::query("delete from photos where id = $1")
            .bind(id)
            .execute(self)
            .await?;

        Ok(())
    }
}

impl<'c, E> PhotosRepo<'c> for E where E: SqliteExecutor<'c> {}
