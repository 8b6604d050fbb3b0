use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use transit_storage::{
    Account, AccountId, CreateAccountParams, CreateOtpChallengeParams, OtpChallenge,
    OtpChallengeId, Role, Store, StoreError, UpdateAccountParams,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn parse_timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Backend(format!("invalid timestamp {}", secs)))
}

type AccountRow = (String, String, String, String, String, i64, i64);

fn account_from_row(row: AccountRow) -> Result<Account, StoreError> {
    let (id, name, email, password_hash, role, created_at, updated_at) = row;
    Ok(Account {
        id: AccountId(Uuid::try_parse(&id).map_err(|e| StoreError::Backend(e.to_string()))?),
        name,
        email,
        password_hash,
        role: Role::from_str(&role).map_err(|e| StoreError::Backend(e.to_string()))?,
        created_at: parse_timestamp(created_at)?,
        updated_at: parse_timestamp(updated_at)?,
    })
}

const ACCOUNT_COLUMNS: &str = "id,name,email,password_hash,role,created_at,updated_at";

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ─────────────────────────────── Accounts ───────────────────────────────

    async fn create_account(&self, p: &CreateAccountParams) -> Result<Account, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO accounts(id,name,email,password_hash,role,created_at,updated_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&p.name)
        .bind(&p.email)
        .bind(&p.password_hash)
        .bind(p.role.as_str())
        .bind(now.timestamp())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;

        Ok(Account {
            id: AccountId(id),
            name: p.name.clone(),
            email: p.email.clone(),
            password_hash: p.password_hash.clone(),
            role: p.role,
            created_at: parse_timestamp(now.timestamp())?,
            updated_at: parse_timestamp(now.timestamp())?,
        })
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE email=?",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => account_from_row(row),
        }
    }

    async fn get_account_by_id(&self, id: &AccountId) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE id=?",
            ACCOUNT_COLUMNS
        ))
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => account_from_row(row),
        }
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts ORDER BY created_at DESC, id DESC",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(account_from_row).collect()
    }

    async fn update_account(
        &self,
        id: &AccountId,
        p: &UpdateAccountParams,
    ) -> Result<Account, StoreError> {
        let existing = self.get_account_by_id(id).await?;

        let name = p.name.clone().unwrap_or(existing.name);
        let password_hash = p.password_hash.clone().unwrap_or(existing.password_hash);
        let role = p.role.unwrap_or(existing.role);
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE accounts SET name=?,password_hash=?,role=?,updated_at=? WHERE id=?")
                .bind(&name)
                .bind(&password_hash)
                .bind(role.as_str())
                .bind(now.timestamp())
                .bind(id.0.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

        // The row can vanish between the read above and this write.
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(Account {
            id: id.clone(),
            name,
            email: existing.email,
            password_hash,
            role,
            created_at: existing.created_at,
            updated_at: parse_timestamp(now.timestamp())?,
        })
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), StoreError> {
        // Single conditional statement so two racing deletes of the final
        // two admins cannot both observe a survivable count.
        let result = sqlx::query(
            "DELETE FROM accounts WHERE id=?
             AND (role != 'admin'
                  OR (SELECT COUNT(*) FROM accounts WHERE role='admin') > 1)",
        )
        .bind(id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Either the row is absent or it holds the last admin.
            return match self.get_account_by_id(id).await {
                Ok(_) => Err(StoreError::Conflict),
                Err(e) => Err(e),
            };
        }
        Ok(())
    }

    // ───────────────────────────── OTP challenges ─────────────────────────────

    async fn upsert_otp_challenge(
        &self,
        p: &CreateOtpChallengeParams,
    ) -> Result<OtpChallenge, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO otp_challenges(id,email,code_hash,attempts,created_at,expires_at)
             VALUES(?,?,?,0,?,?)
             ON CONFLICT(email) DO UPDATE SET
                 id=excluded.id,
                 code_hash=excluded.code_hash,
                 attempts=0,
                 created_at=excluded.created_at,
                 expires_at=excluded.expires_at",
        )
        .bind(id.to_string())
        .bind(&p.email)
        .bind(&p.code_hash)
        .bind(now.timestamp())
        .bind(p.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(OtpChallenge {
            id: OtpChallengeId(id),
            email: p.email.clone(),
            code_hash: p.code_hash.clone(),
            attempts: 0,
            created_at: parse_timestamp(now.timestamp())?,
            expires_at: parse_timestamp(p.expires_at.timestamp())?,
        })
    }

    async fn get_otp_challenge(&self, email: &str) -> Result<OtpChallenge, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, i64, i64, i64)>(
            "SELECT id,email,code_hash,attempts,created_at,expires_at
             FROM otp_challenges WHERE email=?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some((id, email, code_hash, attempts, created_at, expires_at)) => Ok(OtpChallenge {
                id: OtpChallengeId(
                    Uuid::try_parse(&id).map_err(|e| StoreError::Backend(e.to_string()))?,
                ),
                email,
                code_hash,
                attempts: attempts as i32,
                created_at: parse_timestamp(created_at)?,
                expires_at: parse_timestamp(expires_at)?,
            }),
        }
    }

    async fn increment_otp_attempts(&self, id: &OtpChallengeId) -> Result<i32, StoreError> {
        let result = sqlx::query("UPDATE otp_challenges SET attempts=attempts+1 WHERE id=?")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        let (attempts,) =
            sqlx::query_as::<_, (i64,)>("SELECT attempts FROM otp_challenges WHERE id=?")
                .bind(id.0.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(attempts as i32)
    }

    async fn delete_otp_challenge(&self, id: &OtpChallengeId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM otp_challenges WHERE id=?")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete_expired_otp_challenges(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM otp_challenges WHERE expires_at < ?")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
