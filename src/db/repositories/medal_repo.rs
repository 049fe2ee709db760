//! Medal repository

use sqlx::{postgres::PgExecutor, PgPool};

use crate::{
    error::AppResult,
    models::{Medal, MedalCounts, MedalType},
};

/// Repository for medal records
pub struct MedalRepository;

impl MedalRepository {
    /// Insert a medal or overwrite the previous award for the same tournament
    pub async fn upsert<'e, E>(
        executor: E,
        user_id: i64,
        tournament_id: i64,
        position: i32,
        medal_type: MedalType,
    ) -> AppResult<Medal>
    where
        E: PgExecutor<'e>,
    {
        let medal = sqlx::query_as::<_, Medal>(
            r#"
            INSERT INTO medals (user_id, tournament_id, position, medal_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, tournament_id)
            DO UPDATE SET position = EXCLUDED.position, medal_type = EXCLUDED.medal_type
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tournament_id)
        .bind(position)
        .bind(medal_type.as_str())
        .fetch_one(executor)
        .await?;

        Ok(medal)
    }

    /// Medals of a tournament by position
    pub async fn list_for_tournament(pool: &PgPool, tournament_id: i64) -> AppResult<Vec<Medal>> {
        let medals = sqlx::query_as::<_, Medal>(
            r#"SELECT * FROM medals WHERE tournament_id = $1 ORDER BY position, user_id"#,
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await?;

        Ok(medals)
    }

    /// Per-type tally for one user
    pub async fn counts_for_user(pool: &PgPool, user_id: i64) -> AppResult<MedalCounts> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT medal_type, COUNT(*) FROM medals
            WHERE user_id = $1
            GROUP BY medal_type
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let mut counts = MedalCounts::default();
        for (medal_type, count) in rows {
            counts.add(medal_type.parse()?, count);
        }

        Ok(counts)
    }
}
